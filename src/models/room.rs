use rand::Rng;

/// A meeting room. Rooms are unregistered: the identifier is the room, with
/// no server-side record behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
}

impl Room {
    /// Room a user is joining by identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// New room with a freshly generated identifier.
    pub fn create() -> Self {
        Self {
            id: generate_room_id(),
        }
    }

    /// Path of the meeting view for this room.
    pub fn meeting_path(&self) -> String {
        format!("/meeting/{}", self.id)
    }
}

/// 8 lowercase base-36 characters. Collisions are an accepted product risk;
/// there is no uniqueness check.
pub fn generate_room_id() -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();

    (0..8)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_shape() {
        let id = generate_room_id();
        assert_eq!(id.len(), 8);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_meeting_path() {
        let room = Room::with_id("abc123xy");
        assert_eq!(room.meeting_path(), "/meeting/abc123xy");
    }

    #[test]
    fn test_created_room_has_generated_id() {
        let room = Room::create();
        assert_eq!(room.id.len(), 8);
    }
}
