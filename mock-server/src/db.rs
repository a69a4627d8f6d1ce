//! In-memory tables behind the mock backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub role_ids: Vec<i64>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub user_ids: Vec<i64>,
}

/// A recurring slot of an exercise within a class.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassExercise {
    pub id: i64,
    pub class_id: i64,
    pub exercise_id: i64,
    pub teacher_id: i64,
    pub day_of_week: u8,
    pub time_of_exercise: String,
    pub week_interval: u8,
    pub week_offset: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// One dated occurrence of a class exercise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseHistory {
    pub id: i64,
    pub class_id: i64,
    pub class_exercise_id: i64,
    pub exercise_id: i64,
    pub teacher_id: i64,
    pub date: String,
    pub time_of_exercise: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub exercise_history_id: i64,
    pub user_id: i64,
    pub status: String,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub user_id: i64,
    pub exercise_history_id: Option<i64>,
    pub value: f64,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: Option<String>,
    pub content: String,
}

/// All tables. Ids come from one counter, so they are unique across tables.
#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    pub users: BTreeMap<i64, User>,
    pub roles: BTreeMap<i64, Role>,
    pub classes: BTreeMap<i64, Class>,
    pub class_exercises: BTreeMap<i64, ClassExercise>,
    pub exercises: BTreeMap<i64, Exercise>,
    pub history: BTreeMap<i64, ExerciseHistory>,
    pub attendance: BTreeMap<i64, Attendance>,
    pub grades: BTreeMap<i64, Grade>,
    pub tasks: BTreeMap<i64, Task>,
    pub messages: BTreeMap<i64, Message>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn md5_hex(input: &str) -> String {
    format!("{:x}", Md5::digest(input.as_bytes()))
}

impl Store {
    /// Store with the `admin` account and the three base roles.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        let role_ids: Vec<i64> = ["admin", "teacher", "student"]
            .into_iter()
            .map(|name| {
                let id = store.next_id();
                store.roles.insert(
                    id,
                    Role {
                        id,
                        name: name.to_string(),
                    },
                );
                id
            })
            .collect();
        let id = store.next_id();
        store.users.insert(
            id,
            User {
                id,
                login: ADMIN_LOGIN.to_string(),
                email: "admin@example.com".to_string(),
                first_name: "Admin".to_string(),
                last_name: "Account".to_string(),
                is_active: true,
                role_ids: vec![role_ids[0]],
                password_hash: md5_hex(ADMIN_PASSWORD),
            },
        );
        store
    }

    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn user_by_login(&self, login: &str) -> Option<&User> {
        self.users.values().find(|u| u.login == login)
    }

    pub fn attendance_for(&self, history_id: i64, user_id: i64) -> Option<&Attendance> {
        self.attendance
            .values()
            .find(|a| a.exercise_history_id == history_id && a.user_id == user_id)
    }
}

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Store::seeded()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_store_has_admin_and_roles() {
        let store = Store::seeded();
        assert_eq!(store.roles.len(), 3);
        let admin = store.user_by_login(ADMIN_LOGIN).unwrap();
        assert!(admin.is_active);
        assert_eq!(admin.password_hash, "21232f297a57a5a743894a0e4a801fc3");
        assert_eq!(admin.role_ids.len(), 1);
    }

    #[test]
    fn ids_are_unique_across_tables() {
        let mut store = Store::seeded();
        let a = store.next_id();
        let b = store.next_id();
        assert_ne!(a, b);
        assert!(!store.roles.contains_key(&a));
        assert!(!store.users.contains_key(&a));
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let store = Store::seeded();
        let admin = store.user_by_login(ADMIN_LOGIN).unwrap();
        let json = serde_json::to_value(admin).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["login"], "admin");
    }
}
