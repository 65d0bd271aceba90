use anyhow::{bail, Context, Result};

use trackerops::review::{
    format_time, PlaybackClock, Point, Priority, PriorityFilter, TaskDraft, VideoPlayer, PALETTE,
};
use trackerops::{ClientError, Config};

use super::output::{print_comment, print_drawing, print_task};
use super::review_session;

// ─── Comments ────────────────────────────────────────────────────────────────

pub fn cmd_comment_add(config: &Config, text: &str, at: f64) -> Result<()> {
    let mut session = review_session(config);
    session.on_position(at);

    match session.add_comment(text) {
        Some(comment) => {
            println!("💬 Comment added");
            print_comment(&comment);
        }
        None => bail!("Comment text is empty"),
    }
    Ok(())
}

pub fn cmd_comment_list(config: &Config) {
    let session = review_session(config);
    let comments = session.comments().newest_first();

    if comments.is_empty() {
        println!("No comments yet");
        return;
    }
    for comment in &comments {
        print_comment(comment);
    }
    println!("\n({} comments)", comments.len());
}

pub fn cmd_comment_delete(config: &Config, id: u64) -> Result<()> {
    let mut session = review_session(config);
    if !session.delete_comment(id) {
        bail!("No comment with id {id}");
    }
    println!("🗑️  Comment {id} deleted");
    Ok(())
}

// ─── Drawings ────────────────────────────────────────────────────────────────

pub fn cmd_draw(config: &Config, at: f64, points: &str, color: Option<&str>) -> Result<()> {
    let points = points
        .split_whitespace()
        .map(|p| Point::parse(p).with_context(|| format!("invalid point '{p}', expected x,y")))
        .collect::<Result<Vec<_>>>()?;
    let Some((first, rest)) = points.split_first() else {
        bail!("At least one point is required");
    };

    let mut session = review_session(config);
    session.on_position(at);
    let strokes = session.strokes_mut();
    strokes.set_drawing_mode(true);
    strokes.select_color(color.unwrap_or(PALETTE[0]));

    session.begin_stroke(*first);
    for point in rest {
        session.extend_stroke(*point);
    }
    match session.commit_stroke() {
        Some(drawing) => {
            println!("🖌️  Stroke saved");
            print_drawing(drawing);
            println!("   Path: {}", drawing.path);
        }
        None => bail!("Nothing was drawn"),
    }
    Ok(())
}

pub fn cmd_drawings(config: &Config, at: f64) {
    let mut session = review_session(config);
    session.on_position(at);
    let visible = session.visible_drawings();

    println!(
        "🎞️  {} of {} strokes visible at {}",
        visible.len(),
        session.drawings().len(),
        format_time(session.current_time())
    );
    for drawing in visible {
        print_drawing(drawing);
    }
}

pub fn cmd_drawings_clear(config: &Config) {
    let mut session = review_session(config);
    let count = session.drawings().len();
    session.clear_drawings();
    println!("🧹 Cleared {count} strokes");
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

pub fn cmd_task_add(
    config: &Config,
    title: &str,
    description: &str,
    priority: Priority,
    at: f64,
) -> Result<()> {
    let mut session = review_session(config);
    session.on_position(at);

    let draft = TaskDraft::new(title)
        .with_description(description)
        .with_priority(priority);
    let task = session.add_task(&draft)?;

    println!("📌 Task added");
    print_task(&task);
    Ok(())
}

pub fn cmd_task_list(config: &Config, filter: PriorityFilter) {
    let session = review_session(config);
    let tasks = session.sorted_tasks(filter);

    if tasks.is_empty() {
        println!("No tasks");
        return;
    }
    for task in &tasks {
        print_task(task);
    }
    println!(
        "\n({} tasks, {} pending)",
        tasks.len(),
        tasks.iter().filter(|t| !t.completed).count()
    );
}

pub fn cmd_task_toggle(config: &Config, id: &str) -> Result<()> {
    let mut session = review_session(config);
    if session.toggle_task(id)? {
        println!("☑ Task {id} completed");
    } else {
        println!("☐ Task {id} reopened");
    }
    Ok(())
}

pub fn cmd_task_edit(
    config: &Config,
    id: &str,
    title: Option<&str>,
    description: Option<&str>,
    priority: Option<Priority>,
) -> Result<()> {
    let mut session = review_session(config);
    let current = session
        .tasks()
        .get(id)
        .ok_or_else(|| ClientError::NotFound(format!("task {id}")))?;

    // The edit form starts from the task's current values
    let draft = TaskDraft::new(title.unwrap_or(&current.title))
        .with_description(description.unwrap_or(&current.description))
        .with_priority(priority.unwrap_or(current.priority));
    let task = session.update_task(id, &draft)?;

    println!("✏️  Task updated");
    print_task(&task);
    Ok(())
}

pub fn cmd_task_delete(config: &Config, id: &str) -> Result<()> {
    let mut session = review_session(config);
    let task = session.delete_task(id)?;
    println!("🗑️  Deleted task: {}", task.title);
    Ok(())
}

// ─── Playback ────────────────────────────────────────────────────────────────

pub fn cmd_seek(config: &Config, secs: f64, duration: Option<f64>) -> Result<()> {
    let duration = duration.unwrap_or(config.video_duration_secs);
    let mut player = PlaybackClock::ready(config.video_url.as_str(), duration);
    let target = player.seek(secs)?;

    println!("⏩ Seek to {} ({target:.1}s of {duration:.1}s)", format_time(target));
    Ok(())
}
