use artswipe_types::{UserId, WorkId};

/// The two sides of a match in canonical order.
///
/// `user1 < user2` under [`UserId`]'s ordering. Each work is the one its user
/// liked, so `work1` is owned by `user2` and `work2` by `user1`. Because both
/// sides of a mutual like normalise to the same pair, a unique key on
/// `(user1, user2)` is enough to keep one match per user pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPair {
    pub user1: UserId,
    pub work1: WorkId,
    pub user2: UserId,
    pub work2: WorkId,
}

impl MatchPair {
    /// `a_liked` is the work `a` liked; `b_liked` the work `b` liked.
    pub fn canonical(a: UserId, a_liked: WorkId, b: UserId, b_liked: WorkId) -> Self {
        debug_assert_ne!(a, b, "a user cannot match with themselves");

        if a <= b {
            Self {
                user1: a,
                work1: a_liked,
                user2: b,
                work2: b_liked,
            }
        } else {
            Self {
                user1: b,
                work1: b_liked,
                user2: a,
                work2: a_liked,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn either_side_gives_the_same_pair() {
        let (a, b) = (UserId::new(), UserId::new());
        let (wa, wb) = (WorkId::new(), WorkId::new());

        // a liked wb, b liked wa
        let from_a = MatchPair::canonical(a, wb, b, wa);
        let from_b = MatchPair::canonical(b, wa, a, wb);
        assert_eq!(from_a, from_b);
    }

    #[test]
    fn smaller_id_comes_first_with_its_liked_work() {
        let (a, b) = (UserId::new(), UserId::new());
        let (wa, wb) = (WorkId::new(), WorkId::new());
        let pair = MatchPair::canonical(a, wb, b, wa);

        assert!(pair.user1 < pair.user2);
        if pair.user1 == a {
            assert_eq!((pair.work1, pair.work2), (wb, wa));
        } else {
            assert_eq!((pair.work1, pair.work2), (wa, wb));
        }
    }
}
