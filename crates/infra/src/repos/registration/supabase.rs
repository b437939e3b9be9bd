use super::IRegistrationRepo;
use crate::repos::{FetchError, SupabaseClient};
use webinar_reminders_domain::Registration;

const TABLE: &str = "registrations";

pub struct SupabaseRegistrationRepo {
    client: SupabaseClient,
}

impl SupabaseRegistrationRepo {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IRegistrationRepo for SupabaseRegistrationRepo {
    async fn insert(&self, registration: &Registration) -> Result<(), FetchError> {
        self.client.insert(TABLE, registration).await
    }

    async fn find_all(&self) -> Result<Vec<Registration>, FetchError> {
        self.client.select(TABLE, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupabaseConfig;
    use serde_json::json;
    use std::time::Duration;
    use webinar_reminders_domain::{ChatId, InvalidIdentityError, SubjectIdentity, WebinarId};
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo(server: &MockServer) -> SupabaseRegistrationRepo {
        let config = SupabaseConfig {
            url: server.uri(),
            api_key: "secret".into(),
        };
        let client = SupabaseClient::new(&config, Duration::from_secs(5)).unwrap();
        SupabaseRegistrationRepo::new(client)
    }

    #[tokio::test]
    async fn find_all_sends_credentials_and_parses_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/registrations"))
            .and(query_param("select", "*"))
            .and(header("apikey", "secret"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "telegram_id": "1001", "webinar_id": 7, "full_name": "Dana" },
                { "id": 2, "telegram_id": "@dana", "webinar_id": "7", "email": "d@example.com" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let registrations = repo(&server).find_all().await.unwrap();
        assert_eq!(registrations.len(), 2);
        assert_eq!(registrations[0].subject.chat_id(), Ok(ChatId(1001)));
        assert_eq!(registrations[1].webinar_id, WebinarId::from(7));
        assert!(registrations[1].subject.chat_id().is_err());
    }

    #[tokio::test]
    async fn bad_rows_do_not_fail_the_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/registrations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "telegram_id": "1001", "webinar_id": 7 },
                { "telegram_id": null, "webinar_id": 7 },
                { "telegram_id": "1002" },
                { "telegram_id": "1003", "telegram_username": "@dana", "webinar_id": 7 }
            ])))
            .mount(&server)
            .await;

        let registrations = repo(&server).find_all().await.unwrap();
        // The row without a webinar is dropped, the one without a handle is kept
        assert_eq!(registrations.len(), 3);
        assert_eq!(registrations[0].subject.chat_id(), Ok(ChatId(1001)));
        assert_eq!(
            registrations[1].subject.chat_id(),
            Err(InvalidIdentityError::Missing)
        );
        assert_eq!(registrations[2].subject.chat_id(), Ok(ChatId(1003)));
    }

    #[tokio::test]
    async fn bodies_that_are_not_a_list_of_rows_fail_the_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/registrations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "?" })))
            .mount(&server)
            .await;

        let res = repo(&server).find_all().await;
        assert!(matches!(res, Err(FetchError::Decode { .. })));
    }

    #[tokio::test]
    async fn error_statuses_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/registrations"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        match repo(&server).find_all().await {
            Err(FetchError::Status { status, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("Expected status error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn insert_posts_the_registration() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/registrations"))
            .and(header("prefer", "return=minimal"))
            .and(body_partial_json(json!({
                "telegram_id": "1001",
                "webinar_id": 7,
                "full_name": "Dana"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let mut registration = Registration::new(SubjectIdentity::new("1001"), WebinarId::from(7));
        registration.full_name = Some("Dana".into());
        assert!(repo(&server).insert(&registration).await.is_ok());
    }
}
