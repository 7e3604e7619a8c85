use uuid::Uuid;

/// What a freshly stored comment means for the post author's outstanding
/// notification. The decision is pure; `notification_service::apply`
/// performs the matching write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationIntent {
    /// Self-comments never notify.
    Skip,
    /// No live notification for (recipient, post): start one.
    Create {
        recipient: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    },
    /// A live notification exists: append the comment to it.
    Append {
        notification_id: Uuid,
        comment_id: Uuid,
    },
}

/// Fold a new comment into the at-most-one-live-notification-per-(recipient,
/// post) invariant. `existing` is the id of the live notification for
/// (post author, post), if one is outstanding.
pub fn plan(
    post_author: Uuid,
    post_id: Uuid,
    comment_author: Uuid,
    comment_id: Uuid,
    existing: Option<Uuid>,
) -> NotificationIntent {
    if post_author == comment_author {
        return NotificationIntent::Skip;
    }

    match existing {
        None => NotificationIntent::Create {
            recipient: post_author,
            post_id,
            comment_id,
        },
        Some(notification_id) => NotificationIntent::Append {
            notification_id,
            comment_id,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_comment_creates_a_notification() {
        let author = Uuid::new_v4();
        let commenter = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();

        let intent = plan(author, post_id, commenter, comment_id, None);
        assert_eq!(
            intent,
            NotificationIntent::Create {
                recipient: author,
                post_id,
                comment_id,
            }
        );
    }

    #[test]
    fn later_comments_merge_into_the_live_notification() {
        let author = Uuid::new_v4();
        let commenter = Uuid::new_v4();
        let notification_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();

        let intent = plan(author, Uuid::new_v4(), commenter, comment_id, Some(notification_id));
        assert_eq!(
            intent,
            NotificationIntent::Append {
                notification_id,
                comment_id,
            }
        );
    }

    #[test]
    fn self_comments_are_suppressed() {
        let author = Uuid::new_v4();

        let intent = plan(author, Uuid::new_v4(), author, Uuid::new_v4(), None);
        assert_eq!(intent, NotificationIntent::Skip);

        // Suppressed even when a live notification is already outstanding
        let intent = plan(author, Uuid::new_v4(), author, Uuid::new_v4(), Some(Uuid::new_v4()));
        assert_eq!(intent, NotificationIntent::Skip);
    }
}
