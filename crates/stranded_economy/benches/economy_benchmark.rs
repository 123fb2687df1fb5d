//! Benchmark for crafting, loot rolls and quest evaluation.
//!
//! Run with: cargo bench --package stranded_economy --bench economy_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stranded_economy::{
    resource_table, ChestLootTable, Inventory, ItemKind, QuestContext, QuestLog, RecipeBook,
};

fn benchmark_craft(c: &mut Criterion) {
    let book = RecipeBook::standard();
    let stocked = Inventory::from_counts(ItemKind::ALL.iter().map(|&item| (item, 1_000)));

    c.bench_function("craft_plasma_rifle", |b| {
        b.iter_batched(
            || stocked.clone(),
            |mut inventory| black_box(book.craft(&mut inventory, ItemKind::PlasmaRifle)),
            criterion::BatchSize::SmallInput,
        );
    });

    c.bench_function("validate_standard_book", |b| {
        b.iter(|| black_box(book.validate()));
    });
}

fn benchmark_loot(c: &mut Criterion) {
    let resources = resource_table();
    let chest = ChestLootTable::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("resource_choice", |b| {
        b.iter(|| black_box(resources.choose(&mut rng)));
    });

    c.bench_function("chest_roll", |b| {
        b.iter(|| black_box(chest.roll(&mut rng)));
    });
}

fn benchmark_quests(c: &mut Criterion) {
    let inventory = Inventory::from_counts([(ItemKind::Berries, 3)]);
    let ctx = QuestContext {
        inventory: &inventory,
        enemies_defeated: 2,
        coins_spent: 4,
    };

    c.bench_function("quest_evaluate_open", |b| {
        b.iter_batched(
            QuestLog::standard,
            |mut log| black_box(log.evaluate(&ctx)),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_craft, benchmark_loot, benchmark_quests);
criterion_main!(benches);
