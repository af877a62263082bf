//! `dk show`: full details of one case.
//!
//! Accepts a case id or a case number.

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use crate::project::{Project, clock};
use chrono::NaiveDate;
use clap::Args;
use docket_core::model::user::display_name_for;
use docket_core::model::{Case, Update};
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Case id or case number.
    pub case: String,
}

#[derive(Debug, Serialize)]
pub struct ShowCase {
    #[serde(flatten)]
    pub case: Case,
    pub update_count: usize,
    pub last_update: Option<Update>,
    pub last_update_by: Option<String>,
    pub next_adjournment: Option<NaiveDate>,
}

/// Execute `dk show <case>`.
///
/// # Errors
///
/// Returns an error if the case does not exist or output fails.
pub fn run_show(
    args: &ShowArgs,
    output: OutputMode,
    project_root: &std::path::Path,
) -> anyhow::Result<()> {
    let project = Project::open(project_root, output)?;
    let case_id = project.require_case(&args.case, output)?;
    let repo = project.docket.repo();
    let (_, today) = clock();

    let Some(case) = repo.case(&case_id) else {
        anyhow::bail!("case '{case_id}' disappeared");
    };
    let updates: Vec<&Update> = repo.updates_for(&case_id).collect();
    let last_update = updates.iter().max_by_key(|u| u.date).map(|u| (*u).clone());
    let next_adjournment = updates
        .iter()
        .filter_map(|u| u.adjournment_date)
        .filter(|d| *d >= today)
        .min();

    let detail = ShowCase {
        case: case.clone(),
        update_count: updates.len(),
        last_update_by: last_update
            .as_ref()
            .map(|u| display_name_for(repo.users(), &u.created_by)),
        last_update,
        next_adjournment,
    };

    render_mode(output, &detail, render_show_text, render_show_human)
}

fn render_show_text(item: &ShowCase, w: &mut dyn Write) -> std::io::Result<()> {
    let case = &item.case;
    writeln!(w, "id\t{}", case.id)?;
    writeln!(w, "case_number\t{}", case.case_number)?;
    writeln!(w, "title\t{}", case.title)?;
    writeln!(w, "status\t{}", case.status)?;
    writeln!(w, "category\t{}", case.category)?;
    writeln!(w, "subcategory\t{}", case.subcategory)?;
    writeln!(w, "suit_number\t{}", case.suit_number)?;
    writeln!(w, "petition_date\t{}", case.petition_date)?;
    writeln!(w, "updates\t{}", item.update_count)?;
    if let Some(date) = item.next_adjournment {
        writeln!(w, "next_adjournment\t{date}")?;
    }
    Ok(())
}

fn render_show_human(item: &ShowCase, w: &mut dyn Write) -> std::io::Result<()> {
    let case = &item.case;
    pretty_section(w, &format!("{}  {}", case.case_number, case.title))?;
    pretty_kv(w, "Id", &case.id)?;
    pretty_kv(w, "Status", case.status.as_str())?;
    pretty_kv(w, "Category", format!("{} / {}", case.category, case.subcategory))?;
    pretty_kv(w, "Suit #", case.suit_number_label())?;
    pretty_kv(w, "Petition", case.petition_date.to_string())?;
    if !case.assigned_by.is_empty() {
        pretty_kv(w, "Assigned by", &case.assigned_by)?;
    }
    if !case.description.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", case.description)?;
    }

    writeln!(w)?;
    pretty_rule(w)?;
    pretty_kv(w, "Updates", item.update_count.to_string())?;
    if let Some(update) = &item.last_update {
        pretty_kv(
            w,
            "Last update",
            format!(
                "{} - {} ({})",
                update.date,
                update.current_position,
                item.last_update_by.as_deref().unwrap_or("Unknown")
            ),
        )?;
    }
    pretty_kv(
        w,
        "Next hearing",
        item.next_adjournment
            .map_or_else(|| "-".to_string(), |d| d.to_string()),
    )
}
