//! Review workspace for one video
//!
//! Owns the player clock, the stroke recorder and the three annotation
//! lists, and mirrors every list mutation into the device store. A
//! mutation writes the whole list; an emptied list removes its key.
//! Storage failures are logged and never undo the in-memory change.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::comment::{Comment, CommentLog};
use super::player::{PlaybackClock, VideoPlayer};
use super::stroke::{visible_at, Drawing, Point, StrokeRecorder};
use super::task::{PriorityFilter, Task, TaskBoard, TaskDraft};
use crate::clock::IdSource;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::storage::{KeyValueStore, COMMENTS_KEY, DRAWINGS_KEY, TASKS_KEY};

/// Annotation state for the video under review
pub struct ReviewSession<S> {
    store: S,
    player: PlaybackClock,
    strokes: StrokeRecorder,
    drawings: Vec<Drawing>,
    comments: CommentLog,
    tasks: TaskBoard,
    author: String,
    ids: IdSource,
}

impl<S: KeyValueStore> ReviewSession<S> {
    /// Restore saved annotations. Unreadable lists start empty.
    pub fn open(store: S, config: &Config) -> Self {
        let drawings: Vec<Drawing> = load_list(&store, DRAWINGS_KEY);
        let comments: Vec<Comment> = load_list(&store, COMMENTS_KEY);
        let tasks: Vec<Task> = load_list(&store, TASKS_KEY);

        let ids = IdSource::new();
        for id in drawings.iter().map(|d| d.id).chain(comments.iter().map(|c| c.id)) {
            ids.observe(id);
        }
        for id in tasks.iter().filter_map(|t| t.id.parse::<u64>().ok()) {
            ids.observe(id);
        }

        info!(
            drawings = drawings.len(),
            comments = comments.len(),
            tasks = tasks.len(),
            "Review session opened"
        );

        Self {
            store,
            player: PlaybackClock::new(config.video_url.clone()),
            strokes: StrokeRecorder::new(config.drawing_window_secs),
            drawings,
            comments: CommentLog::from_vec(comments),
            tasks: TaskBoard::from_vec(tasks),
            author: config.comment_author.clone(),
            ids,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn player(&self) -> &PlaybackClock {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlaybackClock {
        &mut self.player
    }

    pub fn strokes(&self) -> &StrokeRecorder {
        &self.strokes
    }

    pub fn strokes_mut(&mut self) -> &mut StrokeRecorder {
        &mut self.strokes
    }

    pub fn current_time(&self) -> f64 {
        self.player.position()
    }

    /// Position callback from the player
    pub fn on_position(&mut self, secs: f64) {
        self.player.set_position(secs);
    }

    // ─── Drawings ───────────────────────────────────────────────────────────

    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn begin_stroke(&mut self, point: Point) -> bool {
        self.strokes.begin(point)
    }

    pub fn extend_stroke(&mut self, point: Point) {
        self.strokes.extend(point);
    }

    /// Gesture release
    pub fn commit_stroke(&mut self) -> Option<&Drawing> {
        let at = self.current_time();
        let drawing = self.strokes.commit(at, &self.ids)?;
        self.push_drawing(drawing)
    }

    /// Gesture cancelled by the system
    pub fn terminate_stroke(&mut self) -> Option<&Drawing> {
        let at = self.current_time();
        let drawing = self.strokes.terminate(at, &self.ids)?;
        self.push_drawing(drawing)
    }

    fn push_drawing(&mut self, drawing: Drawing) -> Option<&Drawing> {
        self.drawings.push(drawing);
        self.save_drawings();
        self.drawings.last()
    }

    pub fn clear_drawings(&mut self) {
        self.drawings.clear();
        self.strokes.cancel();
        self.save_drawings();
    }

    /// Drawings to render at the current position
    pub fn visible_drawings(&self) -> Vec<&Drawing> {
        visible_at(&self.drawings, self.current_time())
    }

    // ─── Comments ───────────────────────────────────────────────────────────

    pub fn comments(&self) -> &CommentLog {
        &self.comments
    }

    /// Comment at the current position. Blank text adds nothing.
    pub fn add_comment(&mut self, text: &str) -> Option<Comment> {
        let at = self.current_time();
        let added = self.comments.add(text, at, &self.author, &self.ids)?.clone();
        self.save_comments();
        Some(added)
    }

    pub fn delete_comment(&mut self, id: u64) -> bool {
        let removed = self.comments.delete(id);
        if removed {
            self.save_comments();
        }
        removed
    }

    /// Jump to a comment marker
    pub fn seek_to_comment(&mut self, id: u64) -> Result<f64> {
        let at = self
            .comments
            .get(id)
            .map(|c| c.timestamp)
            .ok_or_else(|| ClientError::NotFound(format!("comment {id}")))?;
        self.seek(at)
    }

    // ─── Tasks ──────────────────────────────────────────────────────────────

    pub fn tasks(&self) -> &TaskBoard {
        &self.tasks
    }

    pub fn sorted_tasks(&self, filter: PriorityFilter) -> Vec<&Task> {
        self.tasks.sorted(filter)
    }

    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<Task> {
        let at = self.current_time();
        let task = self.tasks.add(draft, at, &self.ids)?.clone();
        self.save_tasks();
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, draft: &TaskDraft) -> Result<Task> {
        let task = self.tasks.update(id, draft)?.clone();
        self.save_tasks();
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<bool> {
        let done = self.tasks.toggle(id)?;
        self.save_tasks();
        Ok(done)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        let task = self.tasks.delete(id)?;
        self.save_tasks();
        Ok(task)
    }

    /// Open a task's detail view, seeking to its linked position if any
    pub fn open_task(&mut self, id: &str) -> Result<Option<f64>> {
        let timestamp = self
            .tasks
            .get(id)
            .ok_or_else(|| ClientError::NotFound(format!("task {id}")))?
            .timestamp;
        timestamp.map(|t| self.seek(t)).transpose()
    }

    // ─── Playback ───────────────────────────────────────────────────────────

    /// Seek the player, clamped to the video length
    pub fn seek(&mut self, secs: f64) -> Result<f64> {
        self.player.seek(secs)
    }

    // ─── Persistence ────────────────────────────────────────────────────────

    fn save_drawings(&self) {
        save_list(&self.store, DRAWINGS_KEY, &self.drawings);
    }

    fn save_comments(&self) {
        save_list(&self.store, COMMENTS_KEY, self.comments.as_slice());
    }

    fn save_tasks(&self) {
        save_list(&self.store, TASKS_KEY, self.tasks.as_slice());
    }
}

fn load_list<S: KeyValueStore, T: DeserializeOwned>(store: &S, key: &str) -> Vec<T> {
    match store.get_json::<Vec<T>>(key) {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to load saved list");
            Vec::new()
        }
    }
}

fn save_list<S: KeyValueStore, T: Serialize>(store: &S, key: &str, items: &[T]) {
    let result = if items.is_empty() {
        store.remove_item(key)
    } else {
        store.set_json(key, items)
    };
    match result {
        Ok(()) => debug!(key, count = items.len(), "List saved"),
        Err(e) => warn!(key, error = %e, "Failed to save list"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::task::Priority;
    use crate::storage::MemoryStore;

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ClientError::Storage("disk full".to_string()))
        }
        fn remove_item(&self, _key: &str) -> Result<()> {
            Err(ClientError::Storage("disk full".to_string()))
        }
    }

    fn session() -> ReviewSession<MemoryStore> {
        let mut session = ReviewSession::open(MemoryStore::new(), &Config::default());
        session.player_mut().mark_ready(596.0);
        session
    }

    fn draw(session: &mut ReviewSession<MemoryStore>, at: f64) {
        session.on_position(at);
        session.strokes_mut().set_drawing_mode(true);
        session.begin_stroke(Point::new(1.0, 1.0));
        session.extend_stroke(Point::new(2.0, 2.0));
        session.commit_stroke().unwrap();
    }

    #[test]
    fn comments_persist_and_reload() {
        let mut s = session();
        s.on_position(12.0);
        let c = s.add_comment("needs a cut").unwrap();
        assert!((c.timestamp - 12.0).abs() < f64::EPSILON);
        assert!(s.add_comment("  ").is_none());

        let reopened = ReviewSession::open(
            std::mem::take(&mut s.store),
            &Config::default(),
        );
        assert_eq!(reopened.comments().len(), 1);
        assert_eq!(reopened.comments().as_slice()[0].text, "needs a cut");
    }

    #[test]
    fn drawing_visible_only_near_its_time() {
        let mut s = session();
        draw(&mut s, 100.0);
        assert_eq!(s.visible_drawings().len(), 1);
        s.on_position(104.5);
        assert_eq!(s.visible_drawings().len(), 1);
        s.on_position(105.0);
        assert!(s.visible_drawings().is_empty());
        s.on_position(95.5);
        assert_eq!(s.visible_drawings().len(), 1);
    }

    #[test]
    fn clear_drawings_removes_key() {
        let mut s = session();
        draw(&mut s, 1.0);
        assert!(s.store().get_item(DRAWINGS_KEY).unwrap().is_some());
        s.clear_drawings();
        assert!(s.drawings().is_empty());
        assert!(s.store().get_item(DRAWINGS_KEY).unwrap().is_none());
    }

    #[test]
    fn seek_to_comment_and_task() {
        let mut s = session();
        s.on_position(42.0);
        let c = s.add_comment("here").unwrap();
        let t = s
            .add_task(&TaskDraft::new("fix").with_priority(Priority::High))
            .unwrap();
        s.on_position(0.0);

        assert!((s.seek_to_comment(c.id).unwrap() - 42.0).abs() < f64::EPSILON);
        s.on_position(0.0);
        assert_eq!(s.open_task(&t.id).unwrap(), Some(42.0));
        assert!(matches!(s.seek_to_comment(1), Err(ClientError::NotFound(_))));
    }

    #[test]
    fn seek_clamps_to_duration() {
        let mut s = session();
        assert!((s.seek(10_000.0).unwrap() - 596.0).abs() < f64::EPSILON);
        assert!(s.seek(-1.0).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn task_mutations_are_saved() {
        let mut s = session();
        let t = s.add_task(&TaskDraft::new("a")).unwrap();
        s.toggle_task(&t.id).unwrap();
        let saved: Vec<Task> = s.store().get_json(TASKS_KEY).unwrap().unwrap();
        assert!(saved[0].completed);
        s.delete_task(&t.id).unwrap();
        assert!(s.store().get_item(TASKS_KEY).unwrap().is_none());
    }

    #[test]
    fn ids_continue_after_reload() {
        let mut s = session();
        let first = s.add_comment("a").unwrap().id;
        let mut reopened = ReviewSession::open(std::mem::take(&mut s.store), &Config::default());
        let second = reopened.add_comment("b").unwrap();
        assert!(second.id > first);
        assert_eq!(second.number, 2);
    }

    #[test]
    fn write_failures_do_not_lose_in_memory_state() {
        let mut s = ReviewSession::open(ReadOnlyStore, &Config::default());
        assert!(s.add_comment("kept").is_some());
        assert_eq!(s.comments().len(), 1);
        assert!(s.add_task(&TaskDraft::new("kept too")).is_ok());
    }

    #[test]
    fn loaded_max_id_does_not_overflow() {
        let store = MemoryStore::new();
        store
            .set_item(
                DRAWINGS_KEY,
                r##"[{"id":18446744073709551615,"path":"M0,0","color":"#FF6B6B","timestamp":1.0,"duration":5.0}]"##,
            )
            .unwrap();
        let mut s = ReviewSession::open(store, &Config::default());
        s.player_mut().mark_ready(596.0);

        let comment = s.add_comment("x").unwrap();
        assert_eq!(comment.id, u64::MAX);
        assert!(s.add_task(&TaskDraft::new("y")).is_ok());
        assert_eq!(s.drawings().len(), 1);
    }

    #[test]
    fn corrupt_list_starts_empty() {
        let store = MemoryStore::new();
        store.set_item(COMMENTS_KEY, "[{\"bad\":").unwrap();
        let s = ReviewSession::open(store, &Config::default());
        assert!(s.comments().is_empty());
    }
}
