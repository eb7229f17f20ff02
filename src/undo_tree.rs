use std::fmt::Display;

use undo::History;

#[derive(Clone, PartialEq, Debug)]
pub(crate) struct OldNew<T> {
    pub(crate) old_to_new: T,
    pub(crate) new_to_old: T,
}

pub(crate) trait Applicable: Clone + Display + PartialEq {
    type Target;
    type Output;
    fn apply(&self, target: &mut Self::Target) -> anyhow::Result<Self::Output>;
}

#[derive(Clone)]
pub(crate) struct UndoTree<T: Applicable> {
    history: History<OldNew<T>>,
}

impl<T: Applicable> UndoTree<T> {
    /// Apply `edit` and record it as one undo step.
    pub(crate) fn edit(
        &mut self,
        target: &mut T::Target,
        edit: OldNew<T>,
    ) -> anyhow::Result<T::Output> {
        log::info!("UndoTree::edit {}", edit);
        self.history.edit(target, edit)
    }

    pub(crate) fn undo(&mut self, target: &mut T::Target) -> anyhow::Result<Option<T::Output>> {
        self.history.undo(target).transpose()
    }

    pub(crate) fn redo(&mut self, target: &mut T::Target) -> anyhow::Result<Option<T::Output>> {
        self.history.redo(target).transpose()
    }

    pub(crate) fn new() -> UndoTree<T> {
        Self {
            history: History::new(),
        }
    }
}

impl<T: Applicable> undo::Edit for OldNew<T> {
    type Target = T::Target;
    type Output = anyhow::Result<T::Output>;

    fn edit(&mut self, target: &mut Self::Target) -> Self::Output {
        self.old_to_new.apply(target)
    }

    fn undo(&mut self, target: &mut Self::Target) -> Self::Output {
        self.new_to_old.apply(target)
    }
}

impl<T: Display> Display for OldNew<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.old_to_new.fmt(f)
    }
}

#[cfg(test)]
mod test_undo_tree {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Push(i32);

    impl Display for Push {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "Push({})", self.0)
        }
    }

    impl Applicable for Push {
        type Target = Vec<i32>;
        type Output = ();

        fn apply(&self, target: &mut Self::Target) -> anyhow::Result<()> {
            if self.0 >= 0 {
                target.push(self.0);
            } else {
                target.pop();
            }
            Ok(())
        }
    }

    fn push(value: i32) -> OldNew<Push> {
        OldNew {
            old_to_new: Push(value),
            new_to_old: Push(-1),
        }
    }

    #[test]
    fn undo_then_redo() {
        let mut target = vec![];
        let mut tree = UndoTree::new();
        tree.edit(&mut target, push(1)).unwrap();
        tree.edit(&mut target, push(2)).unwrap();
        assert_eq!(target, vec![1, 2]);

        assert!(tree.undo(&mut target).unwrap().is_some());
        assert_eq!(target, vec![1]);
        assert!(tree.redo(&mut target).unwrap().is_some());
        assert_eq!(target, vec![1, 2]);
        assert!(tree.redo(&mut target).unwrap().is_none());
    }

    #[test]
    fn undo_on_empty_history_is_none() {
        let mut target: Vec<i32> = vec![];
        let mut tree = UndoTree::<Push>::new();
        assert!(tree.undo(&mut target).unwrap().is_none());
    }
}
