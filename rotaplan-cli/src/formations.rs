//! Formations command - list the built-in catalog

use anyhow::Result;

use rotaplan_core::{classify, Formation, Role, FIELD_SIZES};

pub fn run() -> Result<()> {
    for &size in &FIELD_SIZES {
        let Some(formation) = Formation::for_field_size(size) else {
            continue;
        };
        println!("{} ({} positions)", formation.name, formation.field_size());
        for position in formation.positions() {
            println!("  {:<20} {}", position, role_label(classify(position)));
        }
        println!();
    }
    Ok(())
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Keeper => "keeper",
        Role::Defensive => "defensive",
        Role::Offensive => "offensive",
    }
}
