//! # Recipe Book
//!
//! Crafting turns a set of inputs into one unit of an output item.
//!
//! 1. **Transactional**: all inputs are checked before any is consumed
//! 2. **No cycles**: `validate` rejects books where an item can be made,
//!    directly or through other recipes, from itself

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EconomyError, EconomyResult};
use crate::inventory::Inventory;
use crate::item::ItemKind;

/// A crafting recipe producing one `output`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Item produced.
    pub output: ItemKind,
    /// Items consumed, with quantities.
    pub inputs: Vec<(ItemKind, u32)>,
}

impl Recipe {
    /// Creates a recipe.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the recipe has no inputs or a zero quantity.
    pub fn new(output: ItemKind, inputs: Vec<(ItemKind, u32)>) -> EconomyResult<Self> {
        if inputs.is_empty() {
            return Err(EconomyError::InvalidConfig(format!(
                "recipe for {output} must have at least one input"
            )));
        }
        if let Some((item, _)) = inputs.iter().find(|(_, qty)| *qty == 0) {
            return Err(EconomyError::InvalidConfig(format!(
                "recipe for {output} consumes zero {item}"
            )));
        }
        Ok(Self { output, inputs })
    }
}

/// Node colouring for the depth-first cycle search.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// All known recipes, keyed by output.
#[derive(Clone, Debug, Default)]
pub struct RecipeBook {
    recipes: BTreeMap<ItemKind, Recipe>,
}

impl RecipeBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The survival recipes: tools, guns, ammo and the campfire.
    #[must_use]
    pub fn standard() -> Self {
        use ItemKind::{
            AlienCrystal, AlienVine, Axe, Campfire, CrystalShard, EnergyBlaster, EnergyCell, Fiber,
            LaserSword, MetalScrap, PlasmaCell, PlasmaRifle, Stone, Sword, Wood,
        };

        let table: [(ItemKind, &[(ItemKind, u32)]); 8] = [
            (Axe, &[(Stone, 2), (Wood, 2)]),
            (Sword, &[(MetalScrap, 3), (Wood, 1)]),
            (EnergyBlaster, &[(MetalScrap, 5), (AlienCrystal, 3)]),
            (PlasmaRifle, &[(MetalScrap, 10), (CrystalShard, 5), (Fiber, 2)]),
            (LaserSword, &[(AlienCrystal, 4), (AlienVine, 3)]),
            (Campfire, &[(Wood, 3), (Stone, 2)]),
            (EnergyCell, &[(MetalScrap, 1), (AlienCrystal, 1)]),
            (PlasmaCell, &[(CrystalShard, 2), (Fiber, 1)]),
        ];

        let mut book = Self::new();
        for (output, inputs) in table {
            book.recipes.insert(
                output,
                Recipe {
                    output,
                    inputs: inputs.to_vec(),
                },
            );
        }
        book
    }

    /// Adds or replaces the recipe for its output.
    pub fn insert(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.output, recipe);
    }

    /// Recipe producing `item`.
    #[must_use]
    pub fn get(&self, item: ItemKind) -> Option<&Recipe> {
        self.recipes.get(&item)
    }

    /// All recipes, ordered by output.
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// True when the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Checks that `inventory` holds every input for `item`.
    ///
    /// # Errors
    ///
    /// `UnknownRecipe` or `InsufficientMaterials` for the first missing input.
    pub fn can_craft(&self, inventory: &Inventory, item: ItemKind) -> EconomyResult<&Recipe> {
        let recipe = self.get(item).ok_or(EconomyError::UnknownRecipe(item))?;
        for &(input, required) in &recipe.inputs {
            let available = inventory.count(input);
            if available < required {
                return Err(EconomyError::InsufficientMaterials {
                    item: input,
                    required,
                    available,
                });
            }
        }
        Ok(recipe)
    }

    /// Crafts one `item`.
    ///
    /// **ATOMIC**: either every input is consumed and the output credited,
    /// or the inventory is untouched.
    ///
    /// # Errors
    ///
    /// Same as `can_craft`.
    pub fn craft(&self, inventory: &mut Inventory, item: ItemKind) -> EconomyResult<()> {
        let recipe = self.can_craft(inventory, item)?;
        for &(input, quantity) in &recipe.inputs {
            inventory.remove(input, quantity)?;
        }
        inventory.add(recipe.output, 1);
        debug!(item = %item, "crafted");
        Ok(())
    }

    /// Rejects books where some item is (transitively) an input of itself.
    ///
    /// # Errors
    ///
    /// `RecipeCycle` naming an item on the cycle.
    pub fn validate(&self) -> EconomyResult<()> {
        let mut marks = BTreeMap::new();
        for &item in self.recipes.keys() {
            self.visit(item, &mut marks)?;
        }
        Ok(())
    }

    fn visit(&self, item: ItemKind, marks: &mut BTreeMap<ItemKind, Mark>) -> EconomyResult<()> {
        match marks.get(&item) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(EconomyError::RecipeCycle(item)),
            None => {}
        }
        marks.insert(item, Mark::InProgress);
        if let Some(recipe) = self.recipes.get(&item) {
            for &(input, _) in &recipe.inputs {
                self.visit(input, marks)?;
            }
        }
        marks.insert(item, Mark::Done);
        Ok(())
    }
}
