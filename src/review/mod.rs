//! Video review: strokes, comments and tasks pinned to playback time
//!
//! # Features
//!
//! - **Freehand strokes** - touch points captured as SVG paths, shown
//!   only around the moment they were drawn
//! - **Comments** - numbered notes with timeline markers
//! - **Tasks** - prioritized to-dos linked to a video position
//! - **Persistence** - every list mirrored to the device store
//!
//! # Example
//!
//! ```rust,no_run
//! use trackerops::review::{Point, ReviewSession};
//! use trackerops::{Config, MemoryStore};
//!
//! let config = Config::default();
//! let mut session = ReviewSession::open(MemoryStore::new(), &config);
//! session.player_mut().mark_ready(config.video_duration_secs);
//! session.on_position(12.0);
//! session.add_comment("Logo is clipped");
//! session.strokes_mut().set_drawing_mode(true);
//! session.begin_stroke(Point::new(10.0, 10.0));
//! session.extend_stroke(Point::new(40.0, 25.0));
//! session.commit_stroke();
//! assert_eq!(session.visible_drawings().len(), 1);
//! ```

pub mod comment;
pub mod player;
pub mod session;
pub mod stroke;
pub mod task;
pub mod timecode;

pub use comment::{Comment, CommentLog};
pub use player::{clamp_seek, PlaybackClock, PlayerStatus, VideoPlayer, SKIP_SECS};
pub use session::ReviewSession;
pub use stroke::{visible_at, Drawing, Point, StrokeRecorder, PALETTE};
pub use task::{Priority, PriorityFilter, Task, TaskBoard, TaskDraft};
pub use timecode::{format_time, parse_iso, time_ago};
