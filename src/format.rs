use crate::state::PokemonDetails;

/// Uppercases the first character and leaves the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the Info screen text block for `details`.
pub fn format_details(details: &PokemonDetails) -> String {
    let types = join_capitalized(&details.types);
    let abilities = join_capitalized(&details.abilities);
    let mut text = format!(
        "Name: {}\nTypes: {types}\nAbilities: {abilities}\nStats:",
        capitalize(&details.name)
    );
    for stat in &details.stats {
        text.push('\n');
        text.push_str(&format!("{}: {}", capitalize(&stat.name), stat.base_value));
    }
    text
}

fn join_capitalized(items: &[String]) -> String {
    items
        .iter()
        .map(|item| capitalize(item))
        .collect::<Vec<_>>()
        .join(", ")
}
