//! Fabricating a compound from a molecule description.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use drugsim_common::{Drug, Result, Variant, SIDE_EFFECT_VOCABULARY};

use crate::randomizer::Randomizer;

const NAME_PREFIX: &str = "FX-";
const MOL_WEIGHT_RANGE: (f64, f64) = (100.0, 600.0);
const LOG_P_RANGE: (f64, f64) = (-1.0, 5.0);
const PROPERTY_DECIMALS: u8 = 2;

/// Builds [`Drug`] records for one variant.
#[derive(Debug, Clone, Copy)]
pub struct DrugGenerator {
    variant: Variant,
}

impl DrugGenerator {
    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Fabricate a drug from `input`.
    ///
    /// The caller is expected to have rejected blank input already.
    pub fn create_drug(&self, rng: &mut Randomizer, input: &str) -> Result<Drug> {
        let name = format!("{}{}", NAME_PREFIX, rng.random_token(self.variant.name_token_len()));
        let structure = fabricate_structure(input, self.variant.structure_suffix());

        let (description, mol_weight, log_p) = match self.variant {
            Variant::Basic => (
                Some(format!("A novel compound derived from {}.", input)),
                None,
                None,
            ),
            Variant::Enhanced => (
                None,
                Some(rng.random_in_range(MOL_WEIGHT_RANGE.0, MOL_WEIGHT_RANGE.1, PROPERTY_DECIMALS)?),
                Some(rng.random_in_range(LOG_P_RANGE.0, LOG_P_RANGE.1, PROPERTY_DECIMALS)?),
            ),
        };

        let side_effects = rng
            .shuffle_and_take(&SIDE_EFFECT_VOCABULARY, self.variant.drug_side_effect_count())?
            .into_iter()
            .map(str::to_string)
            .collect();

        debug!("Generated {} ({}) from {:?}", name, structure, input);

        Ok(Drug {
            id: Uuid::new_v4(),
            name,
            structure,
            description,
            mol_weight,
            log_p,
            side_effects,
            variant: self.variant,
            created_at: Utc::now(),
        })
    }
}

/// Character-reversed input plus the variant suffix.
pub fn fabricate_structure(input: &str, suffix: &str) -> String {
    let mut structure: String = input.chars().rev().collect();
    structure.push_str(suffix);
    structure
}
