pub mod register_participant;
mod subscribers;
