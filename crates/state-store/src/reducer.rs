//! Reducers - pure functions that produce new state from current state + action

/// A pure, total function from `(state, action)` to the next state
///
/// Reducers must not perform side effects and must return the input state
/// unchanged for actions they do not handle. Any `Fn(S, &A) -> S` closure or
/// function is a reducer:
///
/// ```rust
/// use state_store::Reducer;
///
/// fn reduce(count: u32, action: &bool) -> u32 {
///     if *action { count + 1 } else { count }
/// }
///
/// assert_eq!(reduce.reduce(1, &true), 2);
/// ```
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(S, &A) -> S + Send + Sync,
{
    fn reduce(&self, state: S, action: &A) -> S {
        self(state, action)
    }
}

/// Reducer that runs several sub-reducers in registration order
///
/// Every sub-reducer sees the output of the previous one, so later reducers
/// observe the partially updated state. This lets orthogonal slices (tab list,
/// search engines, ...) be reduced independently while sharing one store.
pub struct CombinedReducer<S, A> {
    reducers: Vec<Box<dyn Reducer<S, A>>>,
}

impl<S, A> CombinedReducer<S, A> {
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Append a sub-reducer; it runs after every reducer added before it
    pub fn with<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        self.reducers.push(Box::new(reducer));
        self
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A> Default for CombinedReducer<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Reducer<S, A> for CombinedReducer<S, A> {
    fn reduce(&self, state: S, action: &A) -> S {
        self.reducers
            .iter()
            .fold(state, |state, reducer| reducer.reduce(state, action))
    }
}

/// Combine reducers into one, threading the state through them in order
pub fn combine_reducers<S, A>(reducers: Vec<Box<dyn Reducer<S, A>>>) -> CombinedReducer<S, A> {
    CombinedReducer { reducers }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct NumberState {
        number: i32,
        even_history: Vec<i32>,
        odd_history: Vec<i32>,
    }

    #[derive(Debug, Clone)]
    enum NumberAction {
        Save(i32),
    }

    fn save_reducer(state: NumberState, action: &NumberAction) -> NumberState {
        match action {
            NumberAction::Save(value) => NumberState {
                number: *value,
                ..state
            },
        }
    }

    fn even_reducer(mut state: NumberState, action: &NumberAction) -> NumberState {
        match action {
            NumberAction::Save(value) if value % 2 == 0 => {
                state.even_history.push(*value);
                state
            }
            _ => state,
        }
    }

    fn odd_reducer(mut state: NumberState, action: &NumberAction) -> NumberState {
        match action {
            NumberAction::Save(value) if value % 2 != 0 => {
                state.odd_history.push(*value);
                state
            }
            _ => state,
        }
    }

    #[test]
    fn test_combined_reducers_thread_state() {
        let reducer = combine_reducers::<NumberState, NumberAction>(vec![
            Box::new(save_reducer),
            Box::new(even_reducer),
            Box::new(odd_reducer),
        ]);

        let state = [2, 3, 6]
            .into_iter()
            .fold(NumberState::default(), |state, value| {
                reducer.reduce(state, &NumberAction::Save(value))
            });

        assert_eq!(state.number, 6);
        assert_eq!(state.even_history, vec![2, 6]);
        assert_eq!(state.odd_history, vec![3]);
    }

    #[test]
    fn test_later_reducers_see_earlier_output() {
        let reducer = CombinedReducer::new()
            .with(|state: i32, _: &()| state + 1)
            .with(|state: i32, _: &()| state * 10);

        assert_eq!(reducer.len(), 2);
        assert_eq!(reducer.reduce(1, &()), 20);
    }

    #[test]
    fn test_empty_combination_returns_input() {
        let reducer: CombinedReducer<i32, ()> = CombinedReducer::default();

        assert!(reducer.is_empty());
        assert_eq!(reducer.reduce(7, &()), 7);
    }
}
