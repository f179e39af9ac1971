//! # Message Lists
//!
//! [`MessageList`] is an ordered sequence of messages with O(1) append,
//! insert-after and remove. Messages live in an arena of slots owned by the
//! list; slots are chained through explicit `prev`/`next` indices and
//! recycled through a free pool.
//!
//! A [`MessageHandle`] names one resident message. It records the id of the
//! owning list and the generation of its slot, so a handle that outlived its
//! message, or that belongs to another list, is recognized instead of
//! silently aliasing whatever occupies the slot now.

use crate::contract::contract_violation;
use crate::message::Message;
use crate::message_type::MessageType;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

static NEXT_LIST_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a [`MessageList`]; unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(u32);

impl ListId {
    fn next() -> Self {
        Self(NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable reference to a message resident in a particular list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    list: ListId,
    index: u32,
    generation: u32,
}

impl MessageHandle {
    /// The list this handle was issued by.
    pub fn list(&self) -> ListId {
        self.list
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    message: Option<Message>,
    prev: Option<u32>,
    next: Option<u32>,
}

/// Ordered, arena-backed list of messages.
pub struct MessageList {
    id: ListId,
    slots: Vec<Slot>,
    free: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl std::fmt::Debug for MessageList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageList")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

impl Default for MessageList {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageList {
    pub fn new() -> Self {
        Self {
            id: ListId::next(),
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn first(&self) -> Option<MessageHandle> {
        self.head.map(|index| self.handle_at(index))
    }

    pub fn last(&self) -> Option<MessageHandle> {
        self.tail.map(|index| self.handle_at(index))
    }

    /// Handle of the message following `handle`, `None` at the tail or when
    /// `handle` is not resident here.
    pub fn next(&self, handle: MessageHandle) -> Option<MessageHandle> {
        let index = self.resolve(handle)?;
        self.slots[index as usize].next.map(|next| self.handle_at(next))
    }

    /// Handle of the message preceding `handle`.
    pub fn prev(&self, handle: MessageHandle) -> Option<MessageHandle> {
        let index = self.resolve(handle)?;
        self.slots[index as usize].prev.map(|prev| self.handle_at(prev))
    }

    /// True while `handle` names a message resident in this list.
    pub fn contains(&self, handle: MessageHandle) -> bool {
        self.resolve(handle).is_some()
    }

    pub fn get(&self, handle: MessageHandle) -> Option<&Message> {
        let index = self.resolve(handle)?;
        self.slots[index as usize].message.as_ref()
    }

    pub fn get_mut(&mut self, handle: MessageHandle) -> Option<&mut Message> {
        let index = self.resolve(handle)?;
        self.slots[index as usize].message.as_mut()
    }

    /// Walks the list head to tail; `.rev()` walks it tail to head.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Whether any resident message has type `kind`.
    pub fn contains_type(&self, kind: MessageType) -> bool {
        self.iter().any(|(_, msg)| msg.kind() == kind)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Appends `message` at the tail.
    pub fn append(&mut self, message: Message) -> MessageHandle {
        self.append_entry(message).0
    }

    /// Appends `message` at the tail and lends it back for further
    /// argument appends.
    pub fn append_entry(&mut self, message: Message) -> (MessageHandle, &mut Message) {
        let index = self.allocate();
        self.link_at_tail(index);
        let handle = self.handle_at(index);
        (handle, self.slots[index as usize].message.insert(message))
    }

    /// Inserts `message` immediately after `anchor`.
    ///
    /// `anchor` must be resident in this list. A foreign or stale anchor is a
    /// contract violation; release builds append at the tail instead.
    pub fn insert_after(&mut self, message: Message, anchor: MessageHandle) -> MessageHandle {
        self.insert_after_entry(message, anchor).0
    }

    /// [`insert_after`](Self::insert_after), lending the inserted message back.
    pub fn insert_after_entry(
        &mut self,
        message: Message,
        anchor: MessageHandle,
    ) -> (MessageHandle, &mut Message) {
        let Some(anchor_index) = self.resolve(anchor) else {
            contract_violation!(
                "🔴 insert_after: anchor {:?} is not resident in list {:?}",
                anchor,
                self.id
            );
            return self.append_entry(message);
        };

        let index = self.allocate();
        let next = self.slots[anchor_index as usize].next;
        {
            let slot = &mut self.slots[index as usize];
            slot.prev = Some(anchor_index);
            slot.next = next;
        }
        self.slots[anchor_index as usize].next = Some(index);
        match next {
            Some(next) => self.slots[next as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
        self.len += 1;
        let handle = self.handle_at(index);
        (handle, self.slots[index as usize].message.insert(message))
    }

    /// Detaches the message named by `handle` and hands it back.
    ///
    /// A foreign or stale handle is a contract violation; release builds
    /// return `None` and leave the list untouched.
    pub fn remove(&mut self, handle: MessageHandle) -> Option<Message> {
        let Some(index) = self.resolve(handle) else {
            contract_violation!(
                "🔴 remove: {:?} is not resident in list {:?}",
                handle,
                self.id
            );
            return None;
        };
        self.unlink(index);
        self.release(index)
    }

    /// Removes and drops the message named by `handle`.
    pub fn destroy(&mut self, handle: MessageHandle) -> bool {
        match self.remove(handle) {
            Some(message) => {
                trace!("🗑️ Destroyed {}", message.kind());
                true
            }
            None => false,
        }
    }

    /// Destroys every resident message, head first. Returns how many were
    /// destroyed.
    pub fn clear(&mut self) -> usize {
        let mut destroyed = 0;
        while let Some(index) = self.head {
            self.unlink(index);
            if self.release(index).is_some() {
                destroyed += 1;
            }
        }
        if destroyed > 0 {
            trace!("🧹 Cleared {} messages from list {:?}", destroyed, self.id);
        }
        destroyed
    }

    /// Moves every resident message out, head first. Messages not yet pulled
    /// from the iterator stay in the list.
    pub fn drain(&mut self) -> Drain<'_> {
        Drain { list: self }
    }

    fn pop_front(&mut self) -> Option<Message> {
        let index = self.head?;
        self.unlink(index);
        self.release(index)
    }

    // ========================================================================
    // Arena bookkeeping
    // ========================================================================

    fn handle_at(&self, index: u32) -> MessageHandle {
        MessageHandle {
            list: self.id,
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    fn resolve(&self, handle: MessageHandle) -> Option<u32> {
        if handle.list != self.id {
            return None;
        }
        let slot = self.slots.get(handle.index as usize)?;
        (slot.generation == handle.generation && slot.message.is_some()).then_some(handle.index)
    }

    /// Takes a vacant slot; the caller links it and then stores the message.
    fn allocate(&mut self) -> u32 {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.prev = None;
                slot.next = None;
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    message: None,
                    prev: None,
                    next: None,
                });
                (self.slots.len() - 1) as u32
            }
        }
    }

    fn release(&mut self, index: u32) -> Option<Message> {
        let slot = &mut self.slots[index as usize];
        let message = slot.message.take();
        slot.generation = slot.generation.wrapping_add(1);
        slot.prev = None;
        slot.next = None;
        self.free.push(index);
        message
    }

    fn link_at_tail(&mut self, index: u32) {
        self.slots[index as usize].prev = self.tail;
        self.slots[index as usize].next = None;
        match self.tail {
            Some(tail) => self.slots[tail as usize].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    fn unlink(&mut self, index: u32) {
        let (prev, next) = {
            let slot = &self.slots[index as usize];
            (slot.prev, slot.next)
        };
        match prev {
            Some(prev) => self.slots[prev as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next as usize].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }
}

/// Borrowing walk over a [`MessageList`].
pub struct Iter<'a> {
    list: &'a MessageList,
    front: Option<u32>,
    back: Option<u32>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (MessageHandle, &'a Message);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        let slot = &self.list.slots[index as usize];
        self.front = slot.next;
        self.remaining -= 1;
        Some((self.list.handle_at(index), slot.message.as_ref()?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        let slot = &self.list.slots[index as usize];
        self.back = slot.prev;
        self.remaining -= 1;
        Some((self.list.handle_at(index), slot.message.as_ref()?))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Order-preserving move out of a [`MessageList`].
pub struct Drain<'a> {
    list: &'a mut MessageList,
}

impl Iterator for Drain<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}
