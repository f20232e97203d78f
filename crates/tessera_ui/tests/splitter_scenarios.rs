//! # Channel Splitter Scenarios
//!
//! End-to-end split/draw/merge sequences on a single draw list:
//!
//! 1. **Table merge**: columns drawn out of order collapse into one command
//! 2. **Header mismatch**: a texture change in a later channel stays separate
//! 3. **Offsets**: every command starts where the previous one ended
//! 4. **Reuse**: the channel pool survives frames without shrinking
//!
//! Run with: cargo test --test splitter_scenarios

use tessera_shared::{Rect, Vec2};
use tessera_ui::{DrawCallback, DrawCmd, DrawList, DrawListSplitter, TextureId, COL32_WHITE};

fn screen() -> Rect {
    Rect::from_coords(0.0, 0.0, 800.0, 600.0)
}

fn rect(list: &mut DrawList, x: f32) {
    list.add_rect_filled(Vec2::new(x, 0.0), Vec2::new(x + 10.0, 10.0), COL32_WHITE);
}

fn triangle(list: &mut DrawList, x: f32) {
    list.add_triangle_filled(Vec2::new(x, 0.0), Vec2::new(x + 5.0, 10.0), Vec2::new(x, 10.0), COL32_WHITE);
}

fn drawn(list: &DrawList) -> Vec<&DrawCmd> {
    list.cmd_buffer.iter().filter(|c| c.elem_count > 0).collect()
}

/// Offsets must tile the index buffer with no gaps or overlaps.
fn assert_sequential(list: &DrawList) {
    let mut expected = 0;
    for cmd in &list.cmd_buffer {
        assert_eq!(cmd.idx_offset, expected, "command offsets must be sequential");
        expected += cmd.elem_count;
    }
    assert_eq!(expected as usize, list.idx_buffer.len());
}

// ============================================================================
// TABLE MERGE
// ============================================================================

#[test]
fn table_merge_collapses_to_one_command() {
    let mut list = DrawList::with_full_screen_clip(screen());
    list.channels_split(3);

    // Draw right-to-left; merge restores channel order
    list.channels_set_current(2);
    rect(&mut list, 200.0);
    list.channels_set_current(1);
    triangle(&mut list, 100.0);
    list.channels_set_current(0);
    rect(&mut list, 0.0);
    list.channels_merge();

    let cmds = drawn(&list);
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].idx_offset, 0);
    assert_eq!(cmds[0].elem_count, 15);
    assert_eq!(list.idx_buffer.len(), 15);
    assert_sequential(&list);

    // Channel 0 geometry comes first in the merged index buffer
    let first_vertex = list.vtx_buffer[list.idx_buffer[0] as usize];
    assert_eq!(first_vertex.pos, [0.0, 0.0]);
    let last_vertex = list.vtx_buffer[list.idx_buffer[14] as usize];
    assert!(last_vertex.pos[0] >= 200.0);
}

#[test]
fn header_mismatch_keeps_separate_commands() {
    let mut list = DrawList::with_full_screen_clip(screen());
    list.channels_split(3);

    list.channels_set_current(1);
    rect(&mut list, 0.0);
    list.channels_set_current(2);
    list.push_texture_id(TextureId(7));
    rect(&mut list, 20.0);
    list.channels_merge();

    let cmds = drawn(&list);
    assert_eq!(cmds.len(), 2);
    assert_eq!((cmds[0].idx_offset, cmds[0].elem_count), (0, 6));
    assert_eq!((cmds[1].idx_offset, cmds[1].elem_count), (6, 6));
    assert_eq!(cmds[0].texture_id, TextureId::NULL);
    assert_eq!(cmds[1].texture_id, TextureId(7));

    // Still drawing with texture 7: geometry keeps folding into the last command
    rect(&mut list, 40.0);
    assert_eq!(drawn(&list).len(), 2);
    assert_eq!(list.cmd_buffer.last().map(|c| c.elem_count), Some(12));
    assert_sequential(&list);
}

#[test]
fn callback_channel_is_never_fused() {
    fn marker(_: &DrawList, _: &DrawCmd) {}

    let mut list = DrawList::with_full_screen_clip(screen());
    list.channels_split(3);
    rect(&mut list, 0.0);
    list.channels_set_current(1);
    list.add_callback(DrawCallback::User(marker), None);
    list.channels_set_current(2);
    rect(&mut list, 20.0);
    list.channels_merge();

    let kinds: Vec<_> = list
        .cmd_buffer
        .iter()
        .filter(|c| c.elem_count > 0 || c.user_callback.is_some())
        .map(|c| (c.user_callback.is_some(), c.elem_count))
        .collect();
    assert_eq!(kinds, vec![(false, 6), (true, 0), (false, 6)]);
    assert_sequential(&list);
}

// ============================================================================
// PROPERTIES
// ============================================================================

/// xorshift, deterministic across runs
fn next(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

#[test]
fn random_channel_walks_keep_offsets_sequential() {
    let mut state = 0x9E37_79B9_7F4A_7C15;
    let mut list = DrawList::with_full_screen_clip(screen());

    for round in 0..50 {
        list.reset_for_new_frame(screen());
        let channels = (next(&mut state) % 6 + 1) as usize;
        list.channels_split(channels);

        let mut submitted = 0;
        for step in 0..40 {
            list.channels_set_current((next(&mut state) % channels as u64) as usize);
            match next(&mut state) % 5 {
                0 => list.push_texture_id(TextureId(step % 3)),
                1 => {
                    let x = (step * 7) as f32;
                    list.push_clip_rect(Vec2::new(x, 0.0), Vec2::new(x + 50.0, 50.0), true);
                }
                2 => {
                    triangle(&mut list, step as f32);
                    submitted += 3;
                }
                _ => {
                    rect(&mut list, step as f32);
                    submitted += 6;
                }
            }
        }
        list.channels_merge();

        assert_eq!(list.idx_buffer.len(), submitted, "round {round}");
        assert_sequential(&list);
        assert_eq!(list.splitter().channel_count(), 1);

        assert!(drawn(&list).iter().all(|c| c.elem_count % 3 == 0), "round {round}");
    }
}

#[test]
fn split_then_merge_without_drawing_is_identity() {
    let mut list = DrawList::with_full_screen_clip(screen());
    rect(&mut list, 0.0);
    list.push_clip_rect(Vec2::ZERO, Vec2::new(5.0, 5.0), true);
    rect(&mut list, 10.0);
    let before: Vec<_> = list.cmd_buffer.iter().map(|c| (c.idx_offset, c.elem_count, c.header())).collect();
    let indices = list.idx_buffer.clone();

    list.channels_split(5);
    list.channels_merge();

    let after: Vec<_> = list.cmd_buffer.iter().map(|c| (c.idx_offset, c.elem_count, c.header())).collect();
    assert_eq!(after, before);
    assert_eq!(list.idx_buffer, indices);
}

#[test]
fn pool_is_reused_across_frames() {
    let mut list = DrawList::with_full_screen_clip(screen());
    let mut splitter = DrawListSplitter::new();

    splitter.split(&mut list, 8);
    splitter.set_current_channel(&mut list, 7);
    rect(&mut list, 0.0);
    splitter.merge(&mut list);
    assert_eq!(splitter.pool_len(), 8);

    list.reset_for_new_frame(screen());
    splitter.split(&mut list, 2);
    splitter.set_current_channel(&mut list, 1);
    rect(&mut list, 0.0);
    splitter.merge(&mut list);
    assert_eq!(splitter.pool_len(), 8);
    assert_eq!(drawn(&list).len(), 1);

    splitter.clear_free_memory();
    assert_eq!(splitter.pool_len(), 0);
}

#[test]
#[should_panic(expected = "nested channel splitting")]
fn nested_split_panics() {
    let mut list = DrawList::with_full_screen_clip(screen());
    list.channels_split(2);
    list.channels_split(2);
}
