/*!
Databases of a search.

- The [cut set](cut_set) of all cuts issued, kept as an antichain.
- The [equalities](equalities) found between individuals.

Domains of markers and individuals are held directly by the [search context](crate::context::SearchContext).
*/

pub mod cut_set;
pub mod equalities;
