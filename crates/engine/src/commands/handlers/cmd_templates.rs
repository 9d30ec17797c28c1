//! `item` and `mob` subcommands, generic over the template family.

use super::*;
use crate::entities::{Template, TemplateFamily};
use mudhall_domain::AttributeMap;
use uuid::Uuid;

fn no_such_template<F: TemplateFamily>(name: &str) -> String {
    format!("There is no {} named '{}'.", F::LABEL, name)
}

pub(super) async fn handle_create<F: TemplateFamily>(
    app: &App,
    ctx: &CommandContext,
) -> Option<String> {
    let name = ctx.required("name");
    let template = Template::<F>::new(name, AttributeMap::new());

    match F::list(&app.world).add(template).await {
        Ok(()) => {
            tracing::info!(kind = F::LABEL, template = %name, "Template created");
            Some(format!("Created the {} '{}'.", F::LABEL, name))
        }
        Err(DomainError::Duplicate(_)) => Some(format!(
            "There is already a {} named '{}'.",
            F::LABEL,
            name
        )),
        Err(e) => Some(describe(&e)),
    }
}

pub(super) async fn handle_list<F: TemplateFamily>(app: &App) -> Option<String> {
    let templates = F::list(&app.world).all().await;
    if templates.is_empty() {
        return Some(format!("There are no {}s yet.", F::LABEL));
    }
    let mut text = format!("Known {}s:", F::LABEL);
    for template in templates {
        text.push_str(&format!(
            "\n  {} ({} instances)",
            template.name(),
            template.instances().await.len()
        ));
    }
    Some(text)
}

pub(super) async fn handle_spawn<F: TemplateFamily>(
    app: &App,
    ctx: &CommandContext,
) -> Option<String> {
    let character = actor(ctx)?;
    let name = ctx.required("name");
    let Some(template) = F::list(&app.world).by_name(name).await else {
        return Some(no_such_template::<F>(name));
    };
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };

    let instance = match template.create_instance_in(app.world.registry(), &room).await {
        Ok(instance) => instance,
        Err(e) => return Some(describe(&e)),
    };
    let id: Uuid = instance.id().into();

    tracing::info!(
        character = %character.name(),
        kind = F::LABEL,
        template = %template.name(),
        instance_id = %id,
        room = %room.location(),
        "Instance spawned"
    );
    app.events
        .announce(
            &room,
            Some(character.id()),
            &format!("{} conjures a {}.", character.name(), template.name()),
        )
        .await;
    app.events.refresh(&room).await;
    Some(format!("You spawn a {}.", template.name()))
}

pub(super) async fn handle_set<F: TemplateFamily>(
    app: &App,
    ctx: &CommandContext,
) -> Option<String> {
    let template_name = ctx.required("template");
    let name = ctx.required("name");
    let value = ctx.arg("value").unwrap_or_default();
    let Some(template) = F::list(&app.world).by_name(template_name).await else {
        return Some(no_such_template::<F>(template_name));
    };

    Some(match template.set_attribute(name, value).await {
        Ok(()) if value.is_empty() => format!("Cleared {}'s {}.", template.name(), name),
        Ok(()) => format!("Set {}'s {} to '{}'.", template.name(), name, value),
        Err(e) => describe(&e),
    })
}

pub(super) async fn handle_instance_set<F: TemplateFamily>(
    app: &App,
    ctx: &CommandContext,
) -> Option<String> {
    let name = ctx.required("name");
    let value = ctx.arg("value").unwrap_or_default();
    let Ok(id) = Uuid::parse_str(ctx.required("instance")) else {
        return Some("That isn't an instance id.".to_string());
    };
    let Some(instance) = app.world.registry().get(id).await.ok().and_then(F::instance) else {
        return Some(format!("There is no {} instance with that id.", F::LABEL));
    };

    Some(match instance.set_attribute(name, value).await {
        Ok(()) if value.is_empty() => {
            format!("Cleared the override of {} on that {}.", name, F::LABEL)
        }
        Ok(()) => format!("Set {} to '{}' on that {}.", name, value, F::LABEL),
        Err(e) => describe(&e),
    })
}

pub(super) async fn handle_instances<F: TemplateFamily>(
    app: &App,
    ctx: &CommandContext,
) -> Option<String> {
    let template_name = ctx.required("template");
    let Some(template) = F::list(&app.world).by_name(template_name).await else {
        return Some(no_such_template::<F>(template_name));
    };
    let instances = template.instances().await;
    if instances.is_empty() {
        return Some(format!("{} has no instances.", template.name()));
    }

    let mut text = format!("Instances of {}:", template.name());
    for instance in instances {
        let id: Uuid = instance.id().into();
        text.push_str(&format!("\n  {} - {}", id, whereabouts(app, id).await));
    }
    Some(text)
}

async fn whereabouts(app: &App, id: Uuid) -> String {
    let registry = app.world.registry();
    match registry.container_of(id).await {
        Some(ContainerOwner::Room(room_id)) => match registry.room(room_id).await {
            Ok(room) => format!("in room {}", room.location()),
            Err(_) => "in a missing room".to_string(),
        },
        Some(ContainerOwner::Character(character_id)) => {
            match registry.character(character_id).await {
                Ok(character) => format!("carried by {}", character.name()),
                Err(_) => "carried by a missing character".to_string(),
            }
        }
        None => "nowhere".to_string(),
    }
}
