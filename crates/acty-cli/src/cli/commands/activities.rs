//! Activity command handlers.

use acty_core::activities::{ActivitiesApi, Activity, ActivityId, ActivityList, NewActivity};
use anyhow::{Context as _, Result};
use comfy_table::{ContentArrangement, Table};

use super::Context;

pub async fn list(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let items = ActivitiesApi::new(&client)
        .list()
        .await
        .context("Failed to load activities")?;

    let mut activities = ActivityList::new();
    activities.replace_all(items);

    if activities.is_empty() {
        println!("No activities.");
    } else {
        println!("{}", render_table(&activities));
    }
    Ok(())
}

pub async fn add(ctx: &Context, content: String, date: String) -> Result<()> {
    let activity = required(NewActivity::new(content, date))?;

    let client = ctx.client()?;
    let created = ActivitiesApi::new(&client)
        .create(&activity)
        .await
        .context("Failed to add activity")?;

    println!("Activity added");
    print_one(created);
    Ok(())
}

pub async fn edit(ctx: &Context, id: &str, content: String, date: String) -> Result<()> {
    let patch = required(NewActivity::new(content, date))?;
    let id = ActivityId::parse(id);

    let client = ctx.client()?;
    let updated = ActivitiesApi::new(&client)
        .update(&id, &patch)
        .await
        .context("Failed to update activity")?;

    println!("Activity updated");
    print_one(updated);
    Ok(())
}

pub async fn replace(ctx: &Context, id: &str, content: String, date: String) -> Result<()> {
    let activity = required(NewActivity::new(content, date))?;
    let id = ActivityId::parse(id);

    let client = ctx.client()?;
    let replaced = ActivitiesApi::new(&client)
        .replace(&id, &activity)
        .await
        .context("Failed to update activity")?;

    println!("Activity updated");
    print_one(replaced);
    Ok(())
}

pub async fn delete(ctx: &Context, id: &str) -> Result<()> {
    let id = ActivityId::parse(id);

    let client = ctx.client()?;
    ActivitiesApi::new(&client)
        .delete(&id)
        .await
        .context("Failed to delete activity")?;

    println!("Activity deleted");
    Ok(())
}

/// Rejects input with an empty required field before anything is sent.
fn required(activity: NewActivity) -> Result<NewActivity> {
    if let Some(field) = activity.missing_field() {
        anyhow::bail!("{field} is required");
    }
    Ok(activity)
}

fn print_one(activity: Activity) {
    println!("{}", render_table(&ActivityList::from(vec![activity])));
}

fn render_table(activities: &ActivityList) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["ID", "Content", "Date"]);
    for activity in activities.iter() {
        table.add_row([
            activity.id.to_string(),
            activity.content.clone(),
            activity.date.clone(),
        ]);
    }
    table.to_string()
}
