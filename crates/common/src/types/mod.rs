use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Single-item response envelope: `{ "data": ... }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Single<T> {
    pub data: T,
}

impl<T> Single<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Collection response envelope: `{ "data": [...], "meta": { "pagination": ... } }`.
#[derive(Serialize, Deserialize, Debug)]
pub struct Collection<T> {
    pub data: Vec<T>,
    pub meta: Meta,
}

impl<T> Collection<T> {
    pub fn new(data: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { data, meta: Meta { pagination } }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Meta {
    pub pagination: PaginationMeta,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Derive the page count from the total; a zero-item result still has one page.
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let per = per_page.max(1) as u64;
        let total_pages = if total == 0 { 1 } else { total.div_ceil(per) };
        Self { page, per_page, total, total_pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_meta_rounds_up() {
        let m = PaginationMeta::new(1, 20, 41);
        assert_eq!(m.total_pages, 3);
    }

    #[test]
    fn pagination_meta_empty_has_one_page() {
        let m = PaginationMeta::new(1, 20, 0);
        assert_eq!(m.total_pages, 1);
    }

    #[test]
    fn envelopes_serialize_expected_shape() {
        let single = Single::new(serde_json::json!({"id": 1}));
        let v = serde_json::to_value(&single).unwrap();
        assert!(v.get("data").is_some());
        assert!(v.get("meta").is_none());

        let coll = Collection::new(vec![1, 2, 3], PaginationMeta::new(1, 3, 7));
        let v = serde_json::to_value(&coll).unwrap();
        assert_eq!(v["meta"]["pagination"]["total"], 7);
        assert_eq!(v["data"].as_array().unwrap().len(), 3);
    }
}
