//! Cache key layout.
//!
//! Detail keys are `<namespace>:<id>`. List keys embed the namespace
//! generation, `<namespace>:list:g<gen>:<scope>:<cursor|start>:<limit>`, so a
//! generation bump orphans every cached page of that namespace at once.

use kernel::pagination::PageRequest;
use uuid::Uuid;

use crate::domain::entity::ReactionTarget;

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const REACTIONS: &str = "reactions";

pub fn detail(namespace: &str, id: &Uuid) -> String {
    format!("{}:{}", namespace, id)
}

pub fn list(namespace: &str, generation: i64, page: &PageRequest) -> String {
    format!("{}:list:g{}:{}", namespace, generation, page.key_fragment())
}

pub fn scoped_list(namespace: &str, generation: i64, scope: &str, page: &PageRequest) -> String {
    format!(
        "{}:list:g{}:{}:{}",
        namespace,
        generation,
        scope,
        page.key_fragment()
    )
}

pub fn reaction_scope(target: &ReactionTarget) -> String {
    format!("{}:{}", target.kind(), target.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::PostId;

    #[test]
    fn test_layout() {
        let id = Uuid::nil();
        assert_eq!(
            detail(USERS, &id),
            "users:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(list(USERS, 3, &PageRequest::first()), "users:list:g3:start:10");

        let page = PageRequest::new(Some(id), Some(5)).unwrap();
        assert_eq!(
            scoped_list(COMMENTS, 0, "abc", &page),
            "comments:list:g0:abc:00000000-0000-0000-0000-000000000000:5"
        );
    }

    #[test]
    fn test_reaction_scope() {
        let target = ReactionTarget::Post(PostId::from_uuid(Uuid::nil()));
        assert_eq!(
            reaction_scope(&target),
            "post:00000000-0000-0000-0000-000000000000"
        );
    }
}
