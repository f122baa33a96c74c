/*!
Dispatches for external observers.

A search sends dispatches through an optional callback held by the [controller](crate::parallel::controller::Controller).
Dispatches are small messages of a fixed type:

- [Reports](report), on something found by a search.
  - For example, a pattern or the bounds after an iteration.
- [Stats](stat), regarding a search as a whole.
  - For example, the count of iterations made.

When no dispatcher is set, no dispatch is built.

# Example

Printing each pattern found.

```rust,ignore
controller.set_dispatcher(Box::new(|dispatch: Dispatch| {
    if let Dispatch::Report(Report::Solution(summary)) = dispatch {
        println!("c {summary}");
    }
}));
```
*/

pub mod report;
pub mod stat;

pub use report::{Outcome, PatternSummary, Report};
pub use stat::Stat;

/// Dispatch types.
#[derive(Clone, Debug)]
pub enum Dispatch {
    /// A report, e.g. of a pattern found.
    Report(Report),

    /// A statistic, e.g. the count of cuts issued.
    Stat(Stat),
}

/// The callback through which dispatches are sent.
pub type Dispatcher = Box<dyn Fn(Dispatch)>;
