//! Synthetic work to profile

use arbor_profiler::{profile_block, profile_function, profile_section_pop, profile_section_push};
use rayon::prelude::*;
use std::hint::black_box;

fn spin(iterations: u64) -> u64 {
    (0..iterations).fold(0u64, |acc, i| black_box(acc.wrapping_mul(31).wrapping_add(i)))
}

pub fn frame(index: u32) {
    profile_function!();

    input();
    simulate(index);
    render();
}

fn input() {
    profile_function!();
    spin(2_000);
}

fn simulate(index: u32) {
    profile_function!();

    profile_section_push!("integrate");
    spin(20_000);
    profile_section_pop!();

    // collision only runs every other frame
    if index % 2 == 0 {
        profile_block!("collide");
        let checksum: u64 = (0..8u64)
            .into_par_iter()
            .map(|cell| {
                profile_block!("collide cell");
                spin(5_000 + cell * 500)
            })
            .sum();
        black_box(checksum);
    }
}

fn render() {
    profile_function!();
    for pass in ["shadows", "opaque", "transparent"] {
        profile_block!(pass);
        spin(8_000);
    }
}

pub fn stream_assets(batches: u32) {
    profile_function!();
    for _ in 0..batches {
        profile_section_push!("decode");
        spin(30_000);
        profile_section_pop!();

        profile_section_push!();
        spin(1_000);
        profile_section_pop!();
    }
}
