use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{comments, notifications, posts};

// --- Posts ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub category: String,
    pub author_id: Uuid,
    pub hallway: String,
    pub location: String,
    /// Append-only; ordered by arrival.
    pub comment_ids: Vec<Uuid>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub category: String,
    pub author_id: Uuid,
    pub hallway: String,
    pub location: String,
    pub comment_ids: Vec<Uuid>,
}

// --- Comments ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub body: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
}

// --- Notifications ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    /// The post author awaiting delivery.
    pub user_id: Uuid,
    pub post_id: Uuid,
    /// Comments accumulated since the last delivery, in arrival order.
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub comment_ids: Vec<Uuid>,
}
