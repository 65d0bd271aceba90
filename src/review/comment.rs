//! Timestamped review comments

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{iso_now, IdSource};

/// A comment pinned to a playback position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub text: String,
    /// Playback time in seconds
    pub timestamp: f64,
    /// Author label
    pub user: String,
    /// RFC 3339
    pub created_at: String,
    /// Running sequence number shown as `#n`
    pub number: u32,
}

impl Comment {
    /// Marker offset along the timeline, `0.0..=1.0`
    pub fn marker_fraction(&self, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        (self.timestamp / duration).clamp(0.0, 1.0)
    }
}

/// Append-only comment list (deletion aside)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentLog {
    comments: Vec<Comment>,
}

impl CommentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    pub fn as_slice(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    fn next_number(&self) -> u32 {
        self.comments
            .iter()
            .map(|c| c.number)
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Append a comment at `current_time`. Blank text is ignored.
    pub fn add(
        &mut self,
        text: &str,
        current_time: f64,
        author: &str,
        ids: &IdSource,
    ) -> Option<&Comment> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let comment = Comment {
            id: ids.next(),
            text: text.to_string(),
            timestamp: current_time,
            user: author.to_string(),
            created_at: iso_now(),
            number: self.next_number(),
        };
        debug!(id = comment.id, number = comment.number, at = current_time, "Comment added");
        self.comments.push(comment);
        self.comments.last()
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != id);
        self.comments.len() != before
    }

    /// Comments for the side panel, newest first
    pub fn newest_first(&self) -> Vec<&Comment> {
        let mut sorted: Vec<&Comment> = self.comments.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_rejected() {
        let ids = IdSource::new();
        let mut log = CommentLog::new();
        assert!(log.add("", 1.0, "User", &ids).is_none());
        assert!(log.add("   \n\t", 1.0, "User", &ids).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_comment_stamped_with_position() {
        let ids = IdSource::new();
        let mut log = CommentLog::new();
        let c = log.add("  too dark here ", 12.75, "Reviewer", &ids).unwrap();
        assert_eq!(c.text, "too dark here");
        assert!((c.timestamp - 12.75).abs() < f64::EPSILON);
        assert_eq!(c.user, "Reviewer");
        assert_eq!(c.number, 1);
    }

    #[test]
    fn test_numbers_strictly_increase_after_delete() {
        let ids = IdSource::new();
        let mut log = CommentLog::new();
        let first = log.add("a", 0.0, "U", &ids).unwrap().id;
        log.add("b", 1.0, "U", &ids);
        assert!(log.delete(first));
        let third = log.add("c", 2.0, "U", &ids).unwrap().number;
        assert_eq!(third, 3);
        assert!(!log.delete(first));
    }

    #[test]
    fn test_number_saturates_on_loaded_max() {
        let ids = IdSource::new();
        let mut log = CommentLog::from_vec(vec![Comment {
            id: 1,
            text: "imported".to_string(),
            timestamp: 0.0,
            user: "U".to_string(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            number: u32::MAX,
        }]);
        let added = log.add("next", 1.0, "U", &ids).unwrap();
        assert_eq!(added.number, u32::MAX);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_newest_first() {
        let ids = IdSource::new();
        let mut log = CommentLog::new();
        log.add("old", 5.0, "U", &ids);
        log.add("new", 1.0, "U", &ids);
        let texts: Vec<&str> = log.newest_first().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "old"]);
    }

    #[test]
    fn test_marker_fraction() {
        let ids = IdSource::new();
        let mut log = CommentLog::new();
        let c = log.add("x", 30.0, "U", &ids).unwrap().clone();
        assert!((c.marker_fraction(120.0) - 0.25).abs() < f64::EPSILON);
        assert!(c.marker_fraction(0.0).abs() < f64::EPSILON);
        assert!((c.marker_fraction(10.0) - 1.0).abs() < f64::EPSILON);
    }
}
