/// Name generation utilities for creating human-readable guest usernames
use markov_namegen::{CharacterChainGenerator, RandomTextGenerator};

/// Training data for the name chain - mix of various cultures and fantasy settings
const TRAINING_NAMES: &[&str] = &[
    // Fantasy inspired
    "Aldric", "Theron", "Gareth", "Mirabel", "Isolde", "Lysander", "Elowen", "Rowan",
    "Caelum", "Astrid", "Eirik", "Freya", "Magnus", "Sigrid", "Bjorn", "Ingrid",
    // Greek/Roman inspired
    "Apollo", "Diana", "Atlas", "Selene", "Orion", "Luna", "Phoenix", "Aurora",
    // Celtic inspired
    "Finn", "Maeve", "Cormac", "Niamh", "Declan", "Siobhan", "Aidan", "Brigid",
    // Nordic inspired
    "Ragnar", "Skald", "Torsten", "Astrid", "Gunnar", "Helga", "Ivar", "Sigrun",
];

/// Create a new name generator
fn create_name_generator() -> CharacterChainGenerator {
    CharacterChainGenerator::builder()
        .with_order(2) // Use bigrams for smoother names
        .with_prior(0.01) // Some randomness
        .train(TRAINING_NAMES.iter().map(|s| *s))
        .build()
}

/// Generate a human-readable random name
///
/// Uses Markov chain-based name generation to create pronounceable
/// names that are easy to tell apart in a player list. Names are
/// limited to alphanumeric characters.
pub fn generate_random_name() -> String {
    let mut generator = create_name_generator();

    // Generate until we get a valid name
    loop {
        let name = generator.generate_one();

        if !name.is_empty()
            && name.len() <= 12 // Keep names reasonably short
            && name.chars().all(|c| c.is_alphanumeric())
        {
            return name;
        }
    }
}

/// Generate a random name with a numeric suffix for uniqueness
///
/// Creates a name like "Theron_42" to keep usernames distinguishable
/// when two guests roll the same base name.
pub fn generate_unique_name() -> String {
    let base_name = generate_random_name();
    let suffix: u16 = rand::random::<u16>() % 1000;
    format!("{}_{}", base_name, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_name() {
        let name = generate_random_name();
        assert!(!name.is_empty());
        assert!(name.len() <= 12);
        assert!(name.chars().all(|c| c.is_alphanumeric()));
    }

    #[test]
    fn test_generate_unique_name() {
        let name = generate_unique_name();
        assert!(!name.is_empty());
        assert!(name.contains('_'));

        // Verify format: name_number
        let parts: Vec<&str> = name.split('_').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].chars().all(|c| c.is_alphanumeric()));
        assert!(parts[1].chars().all(|c| c.is_numeric()));
    }

    #[test]
    fn test_names_are_different() {
        let names: Vec<String> = (0..10).map(|_| generate_unique_name()).collect();
        let unique_count = names.iter().collect::<std::collections::HashSet<_>>().len();
        assert!(unique_count > 5, "Should generate reasonably unique names");
    }
}
