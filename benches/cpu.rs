use criterion::{criterion_group, criterion_main, Criterion};
use dotmatrix::{
    gb::{GameBoy, GameBoyMode},
    handlers::Handlers,
};

fn benchmark_cpu_clock(c: &mut Criterion) {
    let mut handlers = Handlers::default();
    handlers.set_rom_read(|_addr| 0x00);

    let mut gb = GameBoy::new(Some(GameBoyMode::Dmg), handlers).unwrap();
    gb.set_ppu_enabled(false);
    gb.set_dma_enabled(false);
    gb.set_timer_enabled(false);
    gb.reset();

    c.bench_function("cpu_cycles", |b| {
        b.iter(|| {
            gb.clocks_cycles(1_000_000);
        })
    });
}

criterion_group!(benches, benchmark_cpu_clock);
criterion_main!(benches);
