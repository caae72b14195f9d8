//! Dispatches parsed commands into the store and renders the outcome.

use crate::cli::{AddArgs, Command, EditArgs};
use crate::render;
use anyhow::Result;
use projlink_core::{
    filter_entries, parse_tags_input, BlobStorage, IdGenerator, KindCounts, ProjectFields,
    ProjectId, ProjectStore, ProjectView, StoreError,
};

/// Launches a url in the host browser.
pub type Opener<'a> = dyn FnMut(&str) -> std::io::Result<()> + 'a;

pub fn execute<S, G>(
    store: &mut ProjectStore<S, G>,
    command: Command,
    opener: &mut Opener<'_>,
) -> Result<String>
where
    S: BlobStorage,
    G: IdGenerator,
{
    match command {
        Command::Add(args) => {
            let entry = store.create(add_fields(args))?;
            Ok(format!(
                "Success: Project added successfully!\n\n{}",
                render::card(&entry)
            ))
        }
        Command::Edit(args) => {
            let id = ProjectId::new(args.id.clone());
            let base = store
                .get(&id)
                .map(|entry| entry.fields())
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let entry = store.update(&id, apply_edits(base, args))?;
            Ok(format!(
                "Success: Project updated successfully!\n\n{}",
                render::card(&entry)
            ))
        }
        Command::Delete { id } => {
            if store.delete(&ProjectId::new(id.as_str()))? {
                Ok("Deleted: Project link has been removed.\n".to_string())
            } else {
                Ok(format!("Nothing to delete: no entry with id {id}.\n"))
            }
        }
        Command::List { search, tab } => {
            let tab = tab.into();
            let snapshot = ProjectView::new(search, tab).snapshot(store);
            Ok(render::listing(&snapshot, tab))
        }
        Command::Show { id } => {
            let id = ProjectId::new(id);
            let entry = store.get(&id).ok_or(StoreError::NotFound(id.clone()))?;
            Ok(render::card(entry))
        }
        Command::Open { id, print } => {
            let id = ProjectId::new(id);
            let entry = store.get(&id).ok_or(StoreError::NotFound(id.clone()))?;
            if print {
                return Ok(format!("{}\n", entry.url));
            }
            opener(&entry.url)?;
            Ok(format!("Opened {} {}\n", entry.kind.label(), entry.title))
        }
        Command::Counts { search } => {
            let matching = filter_entries(store.list(), &search, None);
            Ok(render::counts(&KindCounts::tally(matching)))
        }
    }
}

fn add_fields(args: AddArgs) -> ProjectFields {
    ProjectFields::new(args.title, args.url)
        .with_description(args.description)
        .with_kind(args.kind.into())
        .with_tags(parse_tags_input(&args.tags))
}

/// Overlays provided edit flags onto the entry's current fields.
fn apply_edits(mut fields: ProjectFields, args: EditArgs) -> ProjectFields {
    if let Some(title) = args.title {
        fields.title = title;
    }
    if let Some(url) = args.url {
        fields.url = url;
    }
    if let Some(description) = args.description {
        fields.description = description;
    }
    if let Some(kind) = args.kind {
        fields.kind = kind.into();
    }
    if let Some(tags) = args.tags {
        fields.tags = parse_tags_input(&tags);
    }
    fields
}
