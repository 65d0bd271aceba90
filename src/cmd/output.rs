use chrono::Utc;

use trackerops::review::{format_time, parse_iso, time_ago, Comment, Drawing, Task};
use trackerops::{SessionUser, User};

pub fn print_session_user(user: &SessionUser) {
    println!("👤 {} <{}>", user.name, user.email);
    println!("   Organization: {}", user.organization);
    println!("   Id: {}", user.id);
    println!("   Photo: {}", photo_label(user.profile_image.as_deref()));
}

pub fn print_user(user: &User) {
    println!("👤 {} <{}>", user.name, user.email);
    println!("   Organization: {}", user.organization);
    println!("   Id: {}", user.id);
    if let Some(ref created) = user.created_at {
        println!("   Member since: {}", created.get(..10).unwrap_or(created));
    }
    println!("   Photo: {}", photo_label(user.profile_image.as_deref()));
}

fn photo_label(uri: Option<&str>) -> String {
    match uri {
        Some(uri) => {
            let mime = uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or("image");
            format!("{mime} ({} bytes encoded)", uri.len())
        }
        None => "none".to_string(),
    }
}

pub fn print_comment(comment: &Comment) {
    let age = parse_iso(&comment.created_at)
        .map_or_else(|| comment.created_at.clone(), |at| time_ago(at, Utc::now()));
    println!(
        "#{:<3} [{}] {} ({}, {age})",
        comment.number,
        format_time(comment.timestamp),
        comment.text,
        comment.user
    );
    println!("     id {}", comment.id);
}

pub fn print_drawing(drawing: &Drawing) {
    println!(
        "✏️  {} at {} {} ({} segments)",
        drawing.id,
        format_time(drawing.timestamp),
        drawing.color,
        drawing.path.matches(" L").count()
    );
}

pub fn print_task(task: &Task) {
    let check = if task.completed { "☑" } else { "☐" };
    let at = task
        .timestamp
        .map(|t| format!(" @ {}", format_time(t)))
        .unwrap_or_default();
    println!("{check} [{}] {}{at}", task.priority.label(), task.title);
    if !task.description.is_empty() {
        println!("     {}", task.description);
    }
    println!("     id {}", task.id);
}
