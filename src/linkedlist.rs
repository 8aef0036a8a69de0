use bumpalo::Bump;
use core::fmt;
use std::fmt::{Debug, Display};

use crate::allocator::{AllocationError, Global, NodeAllocator};

type Link<T> = Option<Box<Node<T>>>;

/*
 * One element of the sequence. A node is owned by exactly one predecessor,
 * or by the list head for the first one.
 */
pub struct Node<T> {
    value: T,
    next: Link<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Self {
        Node { value, next: None }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn next(&self) -> Option<&Node<T>> {
        self.next.as_deref()
    }
}

impl<T: Debug> Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({:?})", self.value)
    }
}

/*
 * Singly linked list. Every node is obtained from and released to <alloc>,
 * and <len> always matches the number of nodes reachable from <head>.
 */
pub struct LinkedList<T, A: NodeAllocator = Global> {
    head: Link<T>,
    len: usize,
    alloc: A,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self::with_allocator(Global)
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: NodeAllocator> LinkedList<T, A> {
    pub fn with_allocator(alloc: A) -> Self {
        LinkedList {
            head: None,
            len: 0,
            alloc,
        }
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Allocates a detached node holding `value`. It must be linked or released.
    fn create_node(&mut self, value: T) -> Result<Box<Node<T>>, AllocationError> {
        self.alloc.allocate(Node::new(value))
    }

    pub fn push_front(&mut self, value: T) -> Result<(), AllocationError> {
        // Nothing is relinked before the node exists, so a failure leaves the list untouched
        let mut node = self.create_node(value)?;
        node.next = self.head.take();
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    pub fn push_back(&mut self, value: T) -> Result<(), AllocationError> {
        let node = self.create_node(value)?;
        let mut cursor = &mut self.head;
        while let Some(curr) = cursor {
            cursor = &mut curr.next;
        }
        *cursor = Some(node);
        self.len += 1;
        Ok(())
    }

    /// First node holding `value`, head to tail.
    pub fn find(&self, value: &T) -> Option<&Node<T>>
    where
        T: PartialEq,
    {
        let mut curr_opt = self.head.as_deref();
        while let Some(curr) = curr_opt {
            if curr.value == *value {
                return Some(curr);
            }
            curr_opt = curr.next.as_deref();
        }
        None
    }

    /*
     * Unlink the first node holding <value> and hand it back to the allocator.
     * Returns false (and changes nothing) when there is no such node.
     */
    pub fn delete(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|curr| curr.value != *value) {
            if let Some(curr) = cursor {
                cursor = &mut curr.next;
            }
        }

        let Some(mut removed) = cursor.take() else {
            return false;
        };
        *cursor = removed.next.take();
        self.alloc.release(removed);
        self.len -= 1;
        true
    }

    /// Releases every node, front to back. The list stays usable afterwards.
    pub fn destroy(&mut self) {
        let mut curr_opt = self.head.take();
        while let Some(mut curr) = curr_opt {
            curr_opt = curr.next.take();
            self.alloc.release(curr);
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    pub fn to_sequence(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /*
     * Copy the current contents into <bump>, so that many snapshots
     * can share the arena's lifetime.
     */
    pub fn snapshot_in<'b>(&self, bump: &'b Bump) -> &'b [T]
    where
        T: Copy,
    {
        bump.alloc_slice_fill_iter(self.iter().copied())
    }
}

impl<T, A: NodeAllocator> Drop for LinkedList<T, A> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/*
 * Display : values separated by arrows, terminated by END
 */
impl<T: Display, A: NodeAllocator> Display for LinkedList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        for value in self {
            write!(f, "{} -> ", value)?;
        }
        write!(f, "END")
    }
}

impl<T: Debug, A: NodeAllocator> Debug for LinkedList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|curr| {
            self.next = curr.next.as_deref();
            self.remaining -= 1;
            &curr.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T, A: NodeAllocator> IntoIterator for &'a LinkedList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
