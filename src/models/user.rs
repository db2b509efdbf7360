//! User model for the admin directory and API responses.

use serde::{Deserialize, Serialize};

/// User record served from the in-memory directory.
///
/// There is no database in this demo; the directory is seeded with mock
/// records and lives only in process memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque user ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (the session subject)
    pub email: String,
    /// Avatar URL
    pub avatar: String,
    /// Remaining TTS character credits
    pub credits: u64,
    /// Either "user" or "admin"; display-only, authorization is derived
    /// from the session claims
    pub role: String,
    /// When the user first signed in (YYYY-MM-DD)
    pub join_date: String,
}

/// Seed records matching the demo storefront's mock data.
pub fn mock_users() -> Vec<User> {
    vec![
        User {
            id: "user_1".to_string(),
            name: "Nguyễn Văn A".to_string(),
            email: "vana@example.com".to_string(),
            avatar: "https://i.pravatar.cc/150?u=user1".to_string(),
            credits: 12_000,
            role: "user".to_string(),
            join_date: "2024-03-10".to_string(),
        },
        User {
            id: "user_2".to_string(),
            name: "Trần Thị B".to_string(),
            email: "thib@example.com".to_string(),
            avatar: "https://i.pravatar.cc/150?u=user2".to_string(),
            credits: 75_000,
            role: "user".to_string(),
            join_date: "2024-01-22".to_string(),
        },
        User {
            id: "user_3".to_string(),
            name: "Lê Hoàng C".to_string(),
            email: "hoangc@example.com".to_string(),
            avatar: "https://i.pravatar.cc/150?u=user3".to_string(),
            credits: 0,
            role: "user".to_string(),
            join_date: "2024-06-01".to_string(),
        },
        User {
            id: "user01".to_string(),
            name: "Người Dùng".to_string(),
            email: "user@example.com".to_string(),
            avatar: "https://i.pravatar.cc/150?u=user".to_string(),
            credits: 50_000,
            role: "user".to_string(),
            join_date: "2024-05-20".to_string(),
        },
        User {
            id: "admin01".to_string(),
            name: "Admin".to_string(),
            email: "admin@aivoice.studio".to_string(),
            avatar: "https://i.pravatar.cc/150?u=admin".to_string(),
            credits: 999_999,
            role: "admin".to_string(),
            join_date: "2023-01-15".to_string(),
        },
    ]
}
