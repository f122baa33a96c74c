/*!
Abstract structures of a search.

- [Cuts](cut) over marker states, the unit of decomposition.
- [Markers](marker) and [individuals](individual), each with a [domain].
- [Solutions](solution), patterns with an objective value.
*/

pub mod cut;
pub mod domain;
pub mod individual;
pub mod marker;
pub mod solution;
