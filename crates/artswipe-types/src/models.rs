use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MatchId, UserId, WorkId};

/// A mutual like between two users.
///
/// `user1_id < user2_id` always holds. `work1_id` is the work `user1_id`
/// liked (owned by `user2_id`) and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub user1_id: UserId,
    pub work1_id: WorkId,
    pub user2_id: UserId,
    pub work2_id: WorkId,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Returns the other participant and the work that participant liked,
    /// or `None` if `user` is not part of this match.
    pub fn partner_of(&self, user: UserId) -> Option<(UserId, WorkId)> {
        if user == self.user1_id {
            Some((self.user2_id, self.work2_id))
        } else if user == self.user2_id {
            Some((self.user1_id, self.work1_id))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        let (a, b) = (UserId::new(), UserId::new());
        let (user1_id, user2_id) = if a < b { (a, b) } else { (b, a) };
        Match {
            id: MatchId::new(),
            user1_id,
            work1_id: WorkId::new(),
            user2_id,
            work2_id: WorkId::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn partner_is_the_other_side() {
        let m = sample();
        assert_eq!(m.partner_of(m.user1_id), Some((m.user2_id, m.work2_id)));
        assert_eq!(m.partner_of(m.user2_id), Some((m.user1_id, m.work1_id)));
    }

    #[test]
    fn outsider_has_no_partner() {
        let m = sample();
        assert!(m.partner_of(UserId::new()).is_none());
    }
}
