//! Plain-text rendering of entries and view snapshots.

use projlink_core::{KindCounts, ProjectEntry, ProjectKind, ViewSnapshot, ViewTab};

const TABS: [ViewTab; 3] = [ViewTab::All, ViewTab::Projects, ViewTab::Webapps];

/// Joins lines with a trailing newline after each one.
fn block<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    lines.into_iter().map(|line| line + "\n").collect()
}

/// One entry as a card-like block.
pub fn card(entry: &ProjectEntry) -> String {
    let mut lines = vec![
        format!("[{}] {}", entry.kind.label(), entry.title),
        format!("  id:   {}", entry.id),
        format!("  url:  {}", entry.url),
    ];
    if !entry.description.is_empty() {
        lines.push(format!("  {}", entry.description));
    }
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|tag| format!("#{tag}")).collect();
        lines.push(format!("  {}", tags.join(" ")));
    }
    block(lines)
}

/// Tab strip with badge counts; the active tab is bracketed.
pub fn tab_strip(counts: &KindCounts, active: ViewTab) -> String {
    TABS.iter()
        .map(|tab| {
            let label = format!("{} ({})", tab.label(), counts.for_kind(tab.kind()));
            if *tab == active {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn listing(snapshot: &ViewSnapshot<'_>, active: ViewTab) -> String {
    if snapshot.collection_empty {
        return "Ready to showcase your work?\n\
                Add your first project or web app link with `projlink add`.\n"
            .to_string();
    }

    let mut out = format!("{}\n\n", tab_strip(&snapshot.counts, active));
    if snapshot.no_matches {
        out.push_str(
            "No projects found\n\
             Try adjusting your search terms or add a new project.\n",
        );
        return out;
    }
    for entry in &snapshot.visible {
        out.push_str(&card(entry));
        out.push('\n');
    }
    out
}

pub fn counts(counts: &KindCounts) -> String {
    let per_kind = ProjectKind::ALL
        .into_iter()
        .map(|kind| format!("{}\t{}", kind, counts.for_kind(Some(kind))));
    block(std::iter::once(format!("all\t{}", counts.all)).chain(per_kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use projlink_core::{ProjectFields, ProjectId};

    #[test]
    fn card_shows_tags_and_skips_empty_description() {
        let entry = ProjectEntry::from_fields(
            ProjectId::new("p-1"),
            ProjectFields::new("Blog", "https://x.com")
                .with_kind(ProjectKind::Webapp)
                .with_tags(["css", "astro"]),
        );
        let text = card(&entry);
        assert!(text.starts_with("[Web App] Blog\n"));
        assert!(text.contains("#css #astro"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn card_with_description_lists_every_line_in_order() {
        let entry = ProjectEntry::from_fields(
            ProjectId::new("p-2"),
            ProjectFields::new("Foo", "https://foo.dev")
                .with_description("Side project")
                .with_tags(["react"]),
        );
        assert_eq!(
            card(&entry),
            "[Project] Foo\n  id:   p-2\n  url:  https://foo.dev\n  Side project\n  #react\n"
        );
    }

    #[test]
    fn tab_strip_brackets_active_tab() {
        let counts = KindCounts {
            all: 3,
            project: 2,
            webapp: 1,
        };
        assert_eq!(
            tab_strip(&counts, ViewTab::Webapps),
            "All (3)  Projects (2)  [Web Apps (1)]"
        );
    }

    #[test]
    fn counts_lists_every_kind() {
        let text = counts(&KindCounts {
            all: 1,
            project: 0,
            webapp: 1,
        });
        assert_eq!(text, "all\t1\nproject\t0\nwebapp\t1\n");
    }
}
