/// Horizon cutoff
///
/// The only stage that makes the generated feed finite. Events pass through
/// untouched until the first one stamped strictly after the limit; that event
/// is held back and the stream ends.

use chrono::NaiveDateTime;

/// Anything carrying a simulated timestamp
pub trait Timestamped {
    fn timestamp(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone)]
pub struct HorizonBound<I: Iterator> {
    inner: I,
    limit: NaiveDateTime,
    overflow: Option<I::Item>,
    done: bool,
}

impl<I> HorizonBound<I>
where
    I: Iterator,
    I::Item: Timestamped,
{
    pub fn new(inner: I, limit: NaiveDateTime) -> Self {
        HorizonBound {
            inner,
            limit,
            overflow: None,
            done: false,
        }
    }

    pub fn limit(&self) -> NaiveDateTime {
        self.limit
    }

    /// First event past the limit, once the cutoff has been hit
    pub fn overflow(&self) -> Option<&I::Item> {
        self.overflow.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.done
    }
}

impl<I> Iterator for HorizonBound<I>
where
    I: Iterator,
    I::Item: Timestamped,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.done {
            return None;
        }

        match self.inner.next() {
            Some(item) if item.timestamp() <= self.limit => Some(item),
            Some(item) => {
                self.overflow = Some(item);
                self.done = true;
                None
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.inner.size_hint().1)
        }
    }
}

impl<I> std::iter::FusedIterator for HorizonBound<I>
where
    I: Iterator,
    I::Item: Timestamped,
{
}

pub trait HorizonExt: Iterator + Sized {
    /// Stop at the first item stamped after `limit`
    fn until(self, limit: NaiveDateTime) -> HorizonBound<Self>
    where
        Self::Item: Timestamped,
    {
        HorizonBound::new(self, limit)
    }
}

impl<I: Iterator> HorizonExt for I {}
