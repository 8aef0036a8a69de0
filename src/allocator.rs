use core::fmt;

use crate::linkedlist::Node;

/*
 * Where list nodes come from and go back to.
 * `release` always receives a node that is already unlinked (next is None),
 * so dropping it never cascades down the chain.
 */
pub trait NodeAllocator {
    fn allocate<T>(&mut self, node: Node<T>) -> Result<Box<Node<T>>, AllocationError>;
    fn release<T>(&mut self, node: Box<Node<T>>);
}

/*
 * The process heap. Box::new aborts on real exhaustion, so this never
 * reports a failure itself.
 */
#[derive(Debug, Default, Clone, Copy)]
pub struct Global;

impl NodeAllocator for Global {
    fn allocate<T>(&mut self, node: Node<T>) -> Result<Box<Node<T>>, AllocationError> {
        Ok(Box::new(node))
    }

    fn release<T>(&mut self, node: Box<Node<T>>) {
        debug_assert!(node.next().is_none());
        drop(node);
    }
}

/*
 * A node budget : at most <limit> nodes alive at once.
 */
#[derive(Debug, Clone)]
pub struct Bounded {
    limit: usize,
    live: usize,
}

impl Bounded {
    pub fn new(limit: usize) -> Self {
        Bounded { limit, live: 0 }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Nodes handed out and not yet released.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl NodeAllocator for Bounded {
    fn allocate<T>(&mut self, node: Node<T>) -> Result<Box<Node<T>>, AllocationError> {
        if self.live >= self.limit {
            return Err(AllocationError { limit: self.limit });
        }
        self.live += 1;
        Ok(Box::new(node))
    }

    fn release<T>(&mut self, node: Box<Node<T>>) {
        debug_assert!(node.next().is_none());
        debug_assert!(self.live > 0);
        self.live = self.live.saturating_sub(1);
        drop(node);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationError {
    pub limit: usize,
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node allocation failed: limit of {} live nodes reached",
            self.limit
        )
    }
}

impl std::error::Error for AllocationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_budget() {
        let mut alloc = Bounded::new(2);
        assert_eq!(alloc.limit(), 2);
        let a = alloc.allocate(Node::new(1)).unwrap();
        let b = alloc.allocate(Node::new(2)).unwrap();
        assert_eq!(alloc.live(), 2);
        assert_eq!(
            alloc.allocate(Node::new(3)).unwrap_err(),
            AllocationError { limit: 2 }
        );

        alloc.release(a);
        assert_eq!(alloc.live(), 1);
        let c = alloc.allocate(Node::new(3)).unwrap();
        assert_eq!(*c.value(), 3);
        alloc.release(b);
        alloc.release(c);
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn zero_limit_refuses_everything() {
        let mut alloc = Bounded::new(0);
        assert!(alloc.allocate(Node::new(7)).is_err());
        assert_eq!(alloc.live(), 0);
    }

    #[test]
    fn error_message() {
        let err = AllocationError { limit: 4 };
        assert_eq!(
            err.to_string(),
            "node allocation failed: limit of 4 live nodes reached"
        );
    }
}
