use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Participant state as published by the hosted video service. The app
/// treats this as read-only external state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub session_id: String,
    pub user_id: String,
    pub name: String,
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub screen_sharing: bool,
}

/// Collapse duplicate sessions so each user gets one tile.
///
/// When a user appears under several session identifiers, the entry with the
/// lexicographically greatest one is kept. Entries without a user identifier
/// are dropped. Output is ordered by user identifier.
pub fn dedup_by_user(participants: &[Participant]) -> Vec<Participant> {
    let mut by_user: BTreeMap<&str, &Participant> = BTreeMap::new();

    for participant in participants {
        if participant.user_id.is_empty() {
            continue;
        }

        match by_user.get(participant.user_id.as_str()) {
            Some(kept) if kept.session_id >= participant.session_id => {}
            _ => {
                by_user.insert(&participant.user_id, participant);
            }
        }
    }

    by_user.into_values().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn participant(session_id: &str, user_id: &str) -> Participant {
        Participant {
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            name: format!("user {user_id}"),
            audio_enabled: true,
            video_enabled: true,
            screen_sharing: false,
        }
    }

    #[test]
    fn test_keeps_greatest_session_per_user() {
        let list = vec![participant("a", "u1"), participant("b", "u1")];

        let deduped = dedup_by_user(&list);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].session_id, "b");
    }

    #[test]
    fn test_order_of_duplicates_does_not_matter() {
        let list = vec![participant("b", "u1"), participant("a", "u1")];

        let deduped = dedup_by_user(&list);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].session_id, "b");
    }

    #[test]
    fn test_drops_entries_without_user_id() {
        let list = vec![participant("a", ""), participant("b", "u1")];

        let deduped = dedup_by_user(&list);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].user_id, "u1");
    }

    #[test]
    fn test_distinct_users_all_kept() {
        let list = vec![
            participant("s3", "u2"),
            participant("s1", "u1"),
            participant("s2", "u3"),
        ];

        let deduped = dedup_by_user(&list);

        let users: Vec<&str> = deduped.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(users, vec!["u1", "u2", "u3"]);
    }
}
