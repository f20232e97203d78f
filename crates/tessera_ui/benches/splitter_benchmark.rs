//! # Draw List Benchmark
//!
//! Measures the per-frame draw path with warm buffers:
//! 1. Plain rect submission into one list
//! 2. Table-style channel split, interleaved drawing, merge
//! 3. Wheel routing through nested child windows

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera_shared::{Rect, Vec2};
use tessera_ui::{DrawList, FrameContext, IoConfig, TextureId, WindowFlags, COL32_WHITE};

const RECT_COUNT: usize = 10_000;
const ROWS: usize = 256;
const COLUMNS: usize = 4;

fn screen() -> Rect {
    Rect::from_coords(0.0, 0.0, 1920.0, 1080.0)
}

fn bench_rect_submission(c: &mut Criterion) {
    let mut list = DrawList::with_full_screen_clip(screen());

    c.bench_function("draw_list_10k_rects", |b| {
        b.iter(|| {
            list.reset_for_new_frame(screen());
            for i in 0..RECT_COUNT {
                let x = (i % 100) as f32 * 10.0;
                let y = (i / 100) as f32 * 10.0;
                list.add_rect_filled(Vec2::new(x, y), Vec2::new(x + 8.0, y + 8.0), COL32_WHITE);
            }
            black_box(list.cmd_buffer.len())
        });
    });
}

fn bench_table_split_merge(c: &mut Criterion) {
    let mut list = DrawList::with_full_screen_clip(screen());

    c.bench_function("splitter_table_256x4", |b| {
        b.iter(|| {
            list.reset_for_new_frame(screen());
            list.channels_split(COLUMNS);
            for row in 0..ROWS {
                for column in 0..COLUMNS {
                    list.channels_set_current(column);
                    let x = column as f32 * 100.0;
                    let y = row as f32 * 4.0;
                    if column == COLUMNS - 1 {
                        list.push_texture_id(TextureId(1));
                    }
                    list.add_rect_filled(Vec2::new(x, y), Vec2::new(x + 90.0, y + 3.0), COL32_WHITE);
                    if column == COLUMNS - 1 {
                        list.pop_texture_id();
                    }
                }
            }
            list.channels_merge();
            black_box(list.idx_buffer.len())
        });
    });
}

fn bench_wheel_routing(c: &mut Criterion) {
    let mut ctx = FrameContext::new(IoConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    let mut parent = None;
    let mut leaf = None;
    for depth in 0..16 {
        let id = ctx
            .create_window(&format!("level{depth}"), WindowFlags::default(), parent)
            .unwrap_or_else(|e| panic!("{e}"));
        if let Some(window) = ctx.windows.get_mut(id) {
            window.size = Vec2::new(400.0, 400.0);
            window.inner_rect = Rect::from_coords(0.0, 0.0, 400.0, 400.0);
            window.scroll_max = if depth == 0 { Vec2::new(0.0, 1.0e6) } else { Vec2::ZERO };
            window.scroll.y = 5.0e5;
        }
        parent = Some(id);
        leaf = Some(id);
    }
    let ids: Vec<_> = ctx.windows.iter().map(|w| w.id).collect();

    c.bench_function("wheel_routing_depth_16", |b| {
        b.iter(|| {
            ctx.input.set_mouse_pos(10.0, 10.0);
            ctx.input.scroll(0.0, 1.0);
            ctx.new_frame(0.016);
            for &id in &ids {
                let _ = ctx.begin_window(id);
            }
            ctx.render();
            black_box(ctx.wheeling_window() == leaf)
        });
    });
}

criterion_group!(benches, bench_rect_submission, bench_table_split_merge, bench_wheel_routing);
criterion_main!(benches);
