#![allow(clippy::module_name_repetitions)]

//! Interactive menu for browsing the dashboard views.
//!
//! Each view is loaded once when opened, the temporal view with the default
//! description. Changing a filter afterwards re-derives the view from the
//! records already loaded; only the temporal view fetches again.

use crime_dash_views::aggregate::distinct_values;
use crime_dash_views::session::ViewSession;
use crime_dash_views::{CrossCity, Hotspots, PoliceImpact, Temporal, View};
use crime_dash_views_models::{
    CrossCityFilter, PoliceImpactFilter, TemporalFilter, ViewKind, ViewState,
};
use dialoguer::{Confirm, Input, Select};
use serde::Serialize;

use crate::context::Context;
use crate::render::RenderText;

/// Label of the "no filter" choice in the description menu.
const ALL_LABEL: &str = "All";
/// Label of the entry that leaves a view.
const BACK_LABEL: &str = "Back to menu";

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is not
/// interactive) or output cannot be produced. Fetch failures are shown and
/// do not end the session.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut labels: Vec<&str> = ViewKind::ALL.iter().map(|kind| kind.title()).collect();
    labels.push("Quit");

    loop {
        let idx = Select::new()
            .with_prompt("Which view would you like to open?")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(kind) = ViewKind::ALL.get(idx) else {
            return Ok(());
        };

        match kind {
            ViewKind::Hotspots => hotspots(ctx).await?,
            ViewKind::CrossCity => cross_city(ctx).await?,
            ViewKind::Temporal => temporal(ctx).await?,
            ViewKind::PoliceImpact => police_impact(ctx).await?,
        }
    }
}

/// Loads `session` and prints it. Returns `false` if the load failed.
async fn fetch_and_show<V>(
    ctx: &Context,
    session: &mut ViewSession<V>,
) -> Result<bool, Box<dyn std::error::Error>>
where
    V: View,
    V::Derived: RenderText + Serialize,
{
    let loaded = ctx.load(session).await.is_ok();
    ctx.show(session)?;
    Ok(loaded)
}

/// A fresh session for `V`, loaded right away with the default filter. The
/// flag is `false` if that first load failed.
async fn open<V>(ctx: &Context) -> Result<(ViewSession<V>, bool), Box<dyn std::error::Error>>
where
    V: View,
    V::Derived: RenderText + Serialize,
{
    let mut session = ViewSession::<V>::new();
    let loaded = fetch_and_show(ctx, &mut session).await?;
    Ok((session, loaded))
}

async fn hotspots(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    open::<Hotspots>(ctx).await?;
    Ok(())
}

async fn cross_city(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, loaded) = open::<CrossCity>(ctx).await?;
    if !loaded {
        return Ok(());
    }

    let descriptions = match session.derive() {
        Some(derived) => derived.descriptions,
        None => return Ok(()),
    };

    let mut labels: Vec<&str> = vec![ALL_LABEL];
    labels.extend(descriptions.iter().map(String::as_str));
    labels.push(BACK_LABEL);

    loop {
        let idx = Select::new()
            .with_prompt("Filter by crime description")
            .items(&labels)
            .default(0)
            .interact()?;

        let description = if idx == 0 {
            String::new()
        } else if let Some(description) = descriptions.get(idx - 1) {
            description.clone()
        } else {
            return Ok(());
        };
        session.set_filter(CrossCityFilter { description });
        ctx.show(&session)?;
    }
}

async fn temporal(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = open::<Temporal>(ctx).await?;

    while Confirm::new()
        .with_prompt("Search another description?")
        .default(true)
        .interact()?
    {
        let description: String = Input::new()
            .with_prompt("Crime description")
            .default(session.filter().description.clone())
            .interact_text()?;
        session.set_filter(TemporalFilter { description });
        fetch_and_show(ctx, &mut session).await?;
    }
    Ok(())
}

async fn police_impact(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, loaded) = open::<PoliceImpact>(ctx).await?;
    if !loaded {
        return Ok(());
    }

    let years = match session.state() {
        ViewState::Ready(normalized) => distinct_values(&normalized.records, "year"),
        _ => return Ok(()),
    };
    if years.is_empty() {
        return Ok(());
    }

    let mut labels: Vec<&str> = years.iter().map(String::as_str).collect();
    labels.push(BACK_LABEL);

    loop {
        let idx = Select::new()
            .with_prompt("Select a year")
            .items(&labels)
            .default(0)
            .interact()?;

        let Some(year) = years.get(idx) else {
            return Ok(());
        };
        session.set_filter(PoliceImpactFilter { year: year.clone() });
        ctx.show(&session)?;
    }
}
