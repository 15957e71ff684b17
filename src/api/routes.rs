/// Default page size for list endpoints
const DEFAULT_LIMIT: i64 = 50;
/// Hard cap so a single request cannot drag the whole table over the wire
const MAX_LIMIT: i64 = 100;

/// Resolve `limit`/`offset`/`page` query parameters into a concrete
/// (limit, offset) pair. A `page` greater than 1 overrides `offset`.
pub fn resolve_pagination(
    limit: Option<i64>,
    offset: Option<i64>,
    page: Option<i64>,
) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    let page = page.unwrap_or(1);

    // If page is provided, calculate the offset
    let offset = if page > 1 { (page - 1) * limit } else { offset };

    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        assert_eq!(resolve_pagination(None, None, None), (50, 0));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(resolve_pagination(Some(10_000), None, None).0, 100);
        assert_eq!(resolve_pagination(Some(0), None, None).0, 1);
    }

    #[test]
    fn page_overrides_offset() {
        assert_eq!(resolve_pagination(Some(20), Some(5), Some(3)), (20, 40));
        assert_eq!(resolve_pagination(Some(20), Some(5), Some(1)), (20, 5));
    }

    #[test]
    fn negative_offset_is_ignored() {
        assert_eq!(resolve_pagination(None, Some(-7), None), (50, 0));
    }
}
