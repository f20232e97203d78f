//! Channel splitter.
//!
//! Lets a caller submit geometry out of visual order (table columns,
//! foreground/background layers) and flatten it back into one contiguous
//! command stream later.
//!
//! ```text
//!   split(3)          set_current(1..2)            merge()
//!  ┌────────┐    ┌────────┬────────┬────────┐    ┌──────────────────┐
//!  │  list  │ →  │ chan 0 │ chan 1 │ chan 2 │ →  │ 0 ++ 1 ++ 2      │
//!  └────────┘    └────────┴────────┴────────┘    │ offsets rebased  │
//!                                                └──────────────────┘
//! ```
//!
//! Only command and index buffers are split; vertices keep going into the
//! list's single vertex buffer, so indices stay valid across the merge.
//! Channel storage is swapped in and out of the list, never copied while
//! switching, and the pool of channels is kept across frames.

use super::command::{DrawCmd, DrawIdx};
use super::list::DrawList;

/// One lane's private command and index buffers.
#[derive(Debug, Default)]
pub struct DrawChannel {
    cmd_buffer: Vec<DrawCmd>,
    idx_buffer: Vec<DrawIdx>,
}

impl DrawChannel {
    /// Commands held by this channel (empty while it is the live one).
    #[must_use]
    pub fn cmd_buffer(&self) -> &[DrawCmd] {
        &self.cmd_buffer
    }

    /// Indices held by this channel (empty while it is the live one).
    #[must_use]
    pub fn idx_buffer(&self) -> &[DrawIdx] {
        &self.idx_buffer
    }

    /// Logical clear; storage is retained.
    fn clear(&mut self) {
        self.cmd_buffer.clear();
        self.idx_buffer.clear();
    }

    fn pop_unused_draw_cmd(&mut self) {
        if self.cmd_buffer.last().is_some_and(DrawCmd::is_unused) {
            self.cmd_buffer.pop();
        }
    }
}

/// Splits a draw list into channels and merges them back.
///
/// Splits do not nest on one list. Use a separate splitter per nesting level.
#[derive(Debug)]
pub struct DrawListSplitter {
    /// Channel pool. Grows on demand, never shrinks.
    channels: Vec<DrawChannel>,
    /// Active channel count. Never exceeds the pool size; 0 before the
    /// first split, 1 after a merge.
    count: usize,
    /// Channel currently living in the list's buffers.
    current: usize,
}

impl DrawListSplitter {
    /// Creates an idle splitter with no channels allocated.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channels: Vec::new(),
            count: 0,
            current: 0,
        }
    }

    /// Active channel count.
    #[inline]
    #[must_use]
    pub const fn channel_count(&self) -> usize {
        self.count
    }

    /// Index of the channel receiving geometry.
    #[inline]
    #[must_use]
    pub const fn current_channel(&self) -> usize {
        self.current
    }

    /// Number of channels allocated in the pool.
    #[inline]
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.channels.len()
    }

    /// Read access to a pooled channel.
    #[must_use]
    pub fn channel(&self, idx: usize) -> Option<&DrawChannel> {
        self.channels.get(idx)
    }

    /// Returns to the idle state without touching the pool.
    pub fn clear(&mut self) {
        self.current = 0;
        self.count = self.channels.len().min(1);
    }

    /// Frees channel storage. Only for teardown; never called per frame.
    pub fn clear_free_memory(&mut self) {
        self.clear();
        self.channels = Vec::new();
    }

    /// Splits `list` into `count` channels. Channel 0 is the list's current
    /// content.
    ///
    /// # Panics
    ///
    /// Panics if a split is already active on this splitter, or if `count`
    /// is zero.
    pub fn split(&mut self, _list: &mut DrawList, count: usize) {
        assert!(
            self.current == 0 && self.count <= 1,
            "nested channel splitting is not supported; use a separate splitter"
        );
        assert!(count > 0, "cannot split into zero channels");

        if self.channels.len() < count {
            self.channels.resize_with(count, DrawChannel::default);
        }
        for channel in &mut self.channels[..count] {
            channel.clear();
        }
        self.count = count;

        tracing::trace!(channels = count, pool = self.channels.len(), "draw list split");
    }

    /// Routes subsequent geometry of `list` into channel `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the active channel range.
    pub fn set_current_channel(&mut self, list: &mut DrawList, idx: usize) {
        assert!(
            idx < self.count,
            "channel {idx} out of range (split into {})",
            self.count
        );
        if self.current == idx {
            return;
        }

        // Park the live buffers in the current channel.
        let parked = &mut self.channels[self.current];
        list.swap_buffers(&mut parked.cmd_buffer, &mut parked.idx_buffer);

        // Whatever came back is spare storage; load the target channel over it.
        list.cmd_buffer.clear();
        list.idx_buffer.clear();
        self.current = idx;
        let target = &mut self.channels[idx];
        list.swap_buffers(&mut target.cmd_buffer, &mut target.idx_buffer);

        fix_trailing_cmd(list);
    }

    /// Flattens all channels back into `list`, in channel order.
    pub fn merge(&mut self, list: &mut DrawList) {
        if self.count <= 1 {
            return;
        }

        self.set_current_channel(list, 0);
        list.pop_unused_draw_cmd();

        let mut idx_offset = list
            .cmd_buffer
            .last()
            .map_or(0, |cmd| cmd.idx_offset + cmd.elem_count);

        for channel in &mut self.channels[1..self.count] {
            channel.pop_unused_draw_cmd();

            let mut cmds = channel.cmd_buffer.drain(..);
            if let Some(first) = cmds.next() {
                // Same state across the channel boundary: one draw call.
                let fuse = list.cmd_buffer.last().is_some_and(|last| last.can_merge_with(&first));
                if fuse {
                    if let Some(last) = list.cmd_buffer.last_mut() {
                        last.elem_count += first.elem_count;
                        idx_offset += first.elem_count;
                    }
                } else {
                    push_rebased(&mut list.cmd_buffer, first, &mut idx_offset);
                }
            }
            for cmd in cmds {
                push_rebased(&mut list.cmd_buffer, cmd, &mut idx_offset);
            }

            list.idx_buffer.extend_from_slice(&channel.idx_buffer);
            channel.idx_buffer.clear();
        }
        // Channel 0 holds spare storage from the last swap.
        self.channels[0].clear();

        fix_trailing_cmd(list);
        self.count = 1;

        tracing::trace!(
            commands = list.cmd_buffer.len(),
            indices = list.idx_buffer.len(),
            "draw list channels merged"
        );
    }
}

impl Default for DrawListSplitter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_rebased(out: &mut Vec<DrawCmd>, mut cmd: DrawCmd, idx_offset: &mut u32) {
    cmd.idx_offset = *idx_offset;
    *idx_offset += cmd.elem_count;
    out.push(cmd);
}

/// Leaves `list` ending in a command compatible with its current header.
fn fix_trailing_cmd(list: &mut DrawList) {
    let header = list.cmd_header;
    let Some(last) = list.cmd_buffer.last_mut() else {
        list.add_draw_cmd();
        return;
    };
    if last.is_unused() {
        last.set_header(header);
    } else if last.user_callback.is_some() || last.header() != header {
        list.add_draw_cmd();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::command::{DrawCallback, TextureId, COL32_WHITE};
    use tessera_shared::Vec2;

    fn quad(list: &mut DrawList) {
        list.add_rect_filled(Vec2::ZERO, Vec2::new(4.0, 4.0), COL32_WHITE);
    }

    fn drawn(list: &DrawList) -> Vec<(u32, u32)> {
        list.cmd_buffer
            .iter()
            .filter(|c| c.elem_count > 0)
            .map(|c| (c.idx_offset, c.elem_count))
            .collect()
    }

    #[test]
    fn test_split_then_merge_is_identity() {
        let mut list = DrawList::new();
        quad(&mut list);
        list.push_texture_id(TextureId(2));
        quad(&mut list);
        let before = drawn(&list);
        let indices = list.idx_buffer.clone();

        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 4);
        splitter.merge(&mut list);

        assert_eq!(drawn(&list), before);
        assert_eq!(list.idx_buffer, indices);
        assert_eq!(splitter.channel_count(), 1);
    }

    #[test]
    fn test_channels_reorder_geometry() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 2);

        // Foreground first, background second: merge restores channel order
        splitter.set_current_channel(&mut list, 1);
        list.push_texture_id(TextureId(1));
        quad(&mut list);
        list.pop_texture_id();
        splitter.set_current_channel(&mut list, 0);
        quad(&mut list);
        splitter.merge(&mut list);

        let textures: Vec<_> = list
            .cmd_buffer
            .iter()
            .filter(|c| c.elem_count > 0)
            .map(|c| c.texture_id)
            .collect();
        assert_eq!(textures, vec![TextureId::NULL, TextureId(1)]);
        assert_eq!(drawn(&list), vec![(0, 6), (6, 6)]);
        // Trailing command follows the list's header again
        assert_eq!(list.cmd_buffer.last().map(|c| c.texture_id), Some(TextureId::NULL));
    }

    #[test]
    fn test_set_current_same_channel_is_noop() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 2);
        quad(&mut list);
        splitter.set_current_channel(&mut list, 0);
        assert_eq!(list.idx_buffer.len(), 6);
        splitter.merge(&mut list);
    }

    #[test]
    fn test_merge_without_split_is_noop() {
        let mut list = DrawList::new();
        quad(&mut list);
        let mut splitter = DrawListSplitter::new();
        splitter.merge(&mut list);
        assert_eq!(drawn(&list), vec![(0, 6)]);
    }

    #[test]
    fn test_empty_channel_keeps_offsets_continuous() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 3);
        quad(&mut list);
        splitter.set_current_channel(&mut list, 1);
        splitter.set_current_channel(&mut list, 2);
        list.push_texture_id(TextureId(5));
        quad(&mut list);
        splitter.merge(&mut list);

        assert_eq!(drawn(&list), vec![(0, 6), (6, 6)]);
    }

    #[test]
    fn test_callback_channel_never_fuses() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 3);
        quad(&mut list);
        splitter.set_current_channel(&mut list, 1);
        list.add_callback(DrawCallback::ResetRenderState, None);
        splitter.set_current_channel(&mut list, 2);
        quad(&mut list);
        splitter.merge(&mut list);

        let kinds: Vec<_> = list
            .cmd_buffer
            .iter()
            .map(|c| (c.user_callback.is_some(), c.elem_count))
            .collect();
        assert_eq!(kinds, vec![(false, 6), (true, 0), (false, 6)]);
        assert_eq!(list.cmd_buffer[2].idx_offset, 6);
    }

    #[test]
    #[should_panic(expected = "nested channel splitting")]
    fn test_nested_split_panics() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 2);
        splitter.split(&mut list, 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_channel_out_of_range_panics() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        splitter.split(&mut list, 2);
        splitter.set_current_channel(&mut list, 2);
    }

    #[test]
    fn test_pool_never_shrinks() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        let mut last_len = 0;
        for count in [4, 2, 6, 1, 3] {
            splitter.split(&mut list, count);
            splitter.set_current_channel(&mut list, count - 1);
            quad(&mut list);
            splitter.merge(&mut list);
            assert!(splitter.pool_len() >= last_len);
            last_len = splitter.pool_len();
        }
        assert_eq!(last_len, 6);
    }

    #[test]
    fn test_count_never_exceeds_pool() {
        let mut list = DrawList::new();
        let mut splitter = DrawListSplitter::new();
        assert_eq!(splitter.channel_count(), 0);
        assert_eq!(splitter.pool_len(), 0);

        splitter.clear();
        assert_eq!(splitter.channel_count(), 0);

        splitter.split(&mut list, 3);
        assert!(splitter.pool_len() >= splitter.channel_count());
        splitter.merge(&mut list);
        assert_eq!(splitter.channel_count(), 1);

        splitter.clear();
        assert_eq!(splitter.channel_count(), 1);
        splitter.clear_free_memory();
        assert_eq!(splitter.channel_count(), 0);
        assert_eq!(splitter.pool_len(), 0);

        // Idle splitter still splits and merges normally
        splitter.split(&mut list, 2);
        splitter.set_current_channel(&mut list, 1);
        quad(&mut list);
        splitter.merge(&mut list);
        assert_eq!(splitter.channel_count(), 1);
    }

    #[test]
    fn test_list_owned_splitter() {
        let mut list = DrawList::new();
        list.channels_split(2);
        list.channels_set_current(1);
        quad(&mut list);
        list.channels_set_current(0);
        quad(&mut list);
        list.channels_merge();

        assert_eq!(list.splitter().channel_count(), 1);
        assert_eq!(drawn(&list), vec![(0, 12)]);
    }
}
