//! # Quest Log
//!
//! Quests track one objective each and pay out one reward on completion.
//! Progress is recomputed from a `QuestContext` whenever something that
//! could move it happens (loot collected, enemy defeated, purchase, craft,
//! quest accepted).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inventory::Inventory;
use crate::item::ItemKind;

/// Stable quest identifier within one log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestId(pub u32);

/// What a quest asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Hold `count` of `item` at once.
    CollectItem {
        /// Item to hold.
        item: ItemKind,
        /// Required count.
        count: u32,
    },
    /// Defeat this many enemies in total.
    DefeatEnemies(u32),
    /// Spend this many gold coins in total.
    SpendCoins(u32),
}

impl Objective {
    /// Target progress value.
    #[must_use]
    pub const fn target(&self) -> u32 {
        match *self {
            Self::CollectItem { count, .. } => count,
            Self::DefeatEnemies(n) | Self::SpendCoins(n) => n,
        }
    }

    /// Current progress under `ctx`.
    #[must_use]
    pub fn progress(&self, ctx: &QuestContext<'_>) -> u32 {
        match *self {
            Self::CollectItem { item, .. } => ctx.inventory.count(item),
            Self::DefeatEnemies(_) => ctx.enemies_defeated,
            Self::SpendCoins(_) => ctx.coins_spent,
        }
    }
}

/// What a quest pays out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    /// Max health +20, health refilled.
    HealthBoost,
    /// Max stamina +20, stamina refilled.
    StaminaBoost,
    /// One unit of an item.
    Item(ItemKind),
    /// Gold coins.
    Coins(u32),
}

/// Quest template, as handed out by an NPC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestOffer {
    /// Text shown to the player.
    pub description: String,
    /// Goal.
    pub objective: Objective,
    /// Payout.
    pub reward: Reward,
}

impl QuestOffer {
    /// Creates an offer.
    #[must_use]
    pub fn new(description: impl Into<String>, objective: Objective, reward: Reward) -> Self {
        Self {
            description: description.into(),
            objective,
            reward,
        }
    }
}

/// A quest in the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quest {
    /// Identifier.
    pub id: QuestId,
    /// Text shown to the player.
    pub description: String,
    /// Goal.
    pub objective: Objective,
    /// Payout.
    pub reward: Reward,
    /// Last computed progress.
    pub progress: u32,
    /// Set once; a completed quest is never re-evaluated.
    pub completed: bool,
}

/// Everything quest progress is computed from.
#[derive(Clone, Copy, Debug)]
pub struct QuestContext<'a> {
    /// Player's inventory.
    pub inventory: &'a Inventory,
    /// Total enemies defeated.
    pub enemies_defeated: u32,
    /// Total gold coins spent in the shop.
    pub coins_spent: u32,
}

/// A quest that completed during an evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Quest that completed.
    pub id: QuestId,
    /// Its description.
    pub description: String,
    /// Reward to apply.
    pub reward: Reward,
}

/// The player's quests.
#[derive(Clone, Debug, Default)]
pub struct QuestLog {
    quests: Vec<Quest>,
    next_id: u32,
}

impl QuestLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The four quests every run starts with.
    #[must_use]
    pub fn standard() -> Self {
        let mut log = Self::new();
        log.accept(QuestOffer::new(
            "Collect 10 berries",
            Objective::CollectItem {
                item: ItemKind::Berries,
                count: 10,
            },
            Reward::HealthBoost,
        ));
        log.accept(QuestOffer::new(
            "Defeat 5 enemies",
            Objective::DefeatEnemies(5),
            Reward::StaminaBoost,
        ));
        log.accept(QuestOffer::new(
            "Collect 3 alien crystals",
            Objective::CollectItem {
                item: ItemKind::AlienCrystal,
                count: 3,
            },
            Reward::Item(ItemKind::EnergyBlaster),
        ));
        log.accept(QuestOffer::new(
            "Spend 20 gold coins",
            Objective::SpendCoins(20),
            Reward::Item(ItemKind::PlasmaRifle),
        ));
        log
    }

    /// Adds a quest built from `offer`.
    pub fn accept(&mut self, offer: QuestOffer) -> QuestId {
        let id = QuestId(self.next_id);
        self.next_id += 1;
        self.quests.push(Quest {
            id,
            description: offer.description,
            objective: offer.objective,
            reward: offer.reward,
            progress: 0,
            completed: false,
        });
        id
    }

    /// Quest by id.
    #[must_use]
    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.quests.iter().find(|quest| quest.id == id)
    }

    /// All quests in acceptance order.
    #[must_use]
    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    /// Number of completed quests.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.quests.iter().filter(|quest| quest.completed).count()
    }

    /// Recomputes progress of every open quest.
    ///
    /// Returns the quests that completed during this call, in log order.
    /// The caller applies the rewards.
    pub fn evaluate(&mut self, ctx: &QuestContext<'_>) -> Vec<Completion> {
        let mut completed = Vec::new();
        for quest in self.quests.iter_mut().filter(|quest| !quest.completed) {
            quest.progress = quest.objective.progress(ctx);
            if quest.progress >= quest.objective.target() {
                quest.completed = true;
                info!(quest = quest.id.0, description = %quest.description, "quest completed");
                completed.push(Completion {
                    id: quest.id,
                    description: quest.description.clone(),
                    reward: quest.reward,
                });
            }
        }
        completed
    }
}
