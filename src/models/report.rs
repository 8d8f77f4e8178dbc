//! Reports filed against comment authors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One user flagging one comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CommentReport {
    pub id: i64,
    pub comment_id: i64,
    pub reporter_id: i64,
    pub reported_user_id: i64,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCommentReport {
    pub comment_id: i64,
    pub reporter_id: i64,
    pub reported_user_id: i64,
}

/// Everything reported about one user, folded into a single view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReport {
    pub reported_user_id: i64,
    pub reports: i64,
    /// Distinct reported comments in ascending id order
    pub comment_ids: Vec<i64>,
    pub last_reported: DateTime<Utc>,
}

impl UserReport {
    /// `None` when the user has never been reported
    pub fn fold(reported_user_id: i64, reports: &[CommentReport]) -> Option<Self> {
        let last_reported = reports.iter().map(|r| r.created).max()?;
        let mut comment_ids: Vec<i64> = reports.iter().map(|r| r.comment_id).collect();
        comment_ids.sort_unstable();
        comment_ids.dedup();

        Some(Self {
            reported_user_id,
            reports: reports.len() as i64,
            comment_ids,
            last_reported,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn report(id: i64, comment_id: i64, reporter_id: i64, created: DateTime<Utc>) -> CommentReport {
        CommentReport { id, comment_id, reporter_id, reported_user_id: 9, created }
    }

    #[test]
    fn test_fold_counts_reports_and_dedups_comments() {
        let now = Utc::now();
        let reports = [
            report(1, 40, 2, now - Duration::hours(2)),
            report(2, 31, 3, now),
            report(3, 40, 4, now - Duration::hours(1)),
        ];
        let folded = UserReport::fold(9, &reports).unwrap();
        assert_eq!(folded.reports, 3);
        assert_eq!(folded.comment_ids, vec![31, 40]);
        assert_eq!(folded.last_reported, now);
    }

    #[test]
    fn test_fold_of_nothing_is_none() {
        assert!(UserReport::fold(9, &[]).is_none());
    }
}
