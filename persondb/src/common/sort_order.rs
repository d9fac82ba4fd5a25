/// Specifies the direction for sorting records.
///
/// Used with `order_by()` when querying a collection:
/// ```text
/// let options = order_by("name", SortOrder::Ascending);
/// let results = collection.find_with_options(filter, &options)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort from smallest to largest value (A to Z, 0 to 9)
    Ascending,
    /// Sort from largest to smallest value (Z to A, 9 to 0)
    Descending,
}
