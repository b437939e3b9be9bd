use std::sync::{Mutex, MutexGuard};
use webinar_reminders_domain::{Entity, WebinarId};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    collection.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

pub fn find<T: Clone + Entity<WebinarId>>(
    val_id: &WebinarId,
    collection: &Mutex<Vec<T>>,
) -> Option<T> {
    lock(collection)
        .iter()
        .find(|item| item.id() == *val_id)
        .cloned()
}

pub fn find_all<T: Clone>(collection: &Mutex<Vec<T>>) -> Vec<T> {
    lock(collection).clone()
}

