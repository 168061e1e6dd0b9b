use std::collections::{HashMap, HashSet};

use contracts::domain::a002_category::{Category, CategoryNode};

/// Построение дерева категорий: сначала группируем детей, потом строим узлы.
///
/// Корни: категории без родителя или со ссылкой на отсутствующего родителя.
/// Узлы на каждом уровне отсортированы по имени без учёта регистра.
/// Категории, замкнутые в цикл, поднимаются в корни: каждая категория
/// попадает в дерево ровно один раз.
pub fn build_tree(items: Vec<Category>) -> Vec<CategoryNode> {
    if items.is_empty() {
        return vec![];
    }

    let existing_ids: HashSet<i64> = items.iter().map(|c| c.id).collect();

    // Группируем детей по parent_id
    let mut children_map: HashMap<Option<i64>, Vec<Category>> = HashMap::new();
    for item in &items {
        let normalized_parent = match item.parent_id {
            Some(pid) if existing_ids.contains(&pid) => Some(pid),
            Some(pid) => {
                tracing::debug!("Category {} has unresolved parent_id {}", item.id, pid);
                None
            }
            None => None,
        };
        children_map
            .entry(normalized_parent)
            .or_default()
            .push(item.clone());
    }
    for kids in children_map.values_mut() {
        sort_by_name(kids);
    }

    let mut visited: HashSet<i64> = HashSet::new();
    let mut roots: Vec<CategoryNode> = children_map
        .get(&None)
        .map(|root_items| {
            root_items
                .iter()
                .filter_map(|item| build_node(item, &children_map, &mut visited))
                .collect()
        })
        .unwrap_or_default();

    // Всё, что не достижимо от корней, сидит в цикле
    let mut orphans: Vec<&Category> = items.iter().filter(|c| !visited.contains(&c.id)).collect();
    if !orphans.is_empty() {
        tracing::warn!("{} categories form parent cycles, promoted to roots", orphans.len());
        orphans.sort_by_key(|c| c.name.to_lowercase());
        for item in orphans {
            if let Some(node) = build_node(item, &children_map, &mut visited) {
                roots.push(node);
            }
        }
    }

    roots.sort_by_key(|n| n.category.name.to_lowercase());
    roots
}

fn build_node(
    item: &Category,
    children_map: &HashMap<Option<i64>, Vec<Category>>,
    visited: &mut HashSet<i64>,
) -> Option<CategoryNode> {
    if !visited.insert(item.id) {
        return None;
    }

    let children = children_map
        .get(&Some(item.id))
        .map(|kids| {
            kids.iter()
                .filter_map(|kid| build_node(kid, children_map, visited))
                .collect()
        })
        .unwrap_or_default();

    Some(CategoryNode {
        category: item.clone(),
        children,
    })
}

fn sort_by_name(items: &mut [Category]) {
    items.sort_by_key(|c| c.name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent_id: Option<i64>, name: &str) -> Category {
        Category {
            id,
            parent_id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn names(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.category.name.as_str()).collect()
    }

    #[test]
    fn test_roots_and_children_sorted() {
        let tree = build_tree(vec![
            category(1, None, "zeta"),
            category(2, None, "Alpha"),
            category(3, Some(2), "beta"),
            category(4, Some(2), "Apple"),
            category(5, Some(99), "orphan"),
        ]);

        assert_eq!(names(&tree), vec!["Alpha", "orphan", "zeta"]);
        assert_eq!(names(&tree[0].children), vec!["Apple", "beta"]);
        assert_eq!(tree.iter().map(CategoryNode::size).sum::<usize>(), 5);
    }

    #[test]
    fn test_cycles_do_not_hang() {
        let tree = build_tree(vec![
            category(1, Some(2), "one"),
            category(2, Some(1), "two"),
            category(3, Some(3), "self"),
            category(4, None, "root"),
        ]);

        assert_eq!(tree.iter().map(CategoryNode::size).sum::<usize>(), 4);
        assert_eq!(names(&tree), vec!["one", "root", "self"]);
        assert_eq!(names(&tree[0].children), vec!["two"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(vec![]).is_empty());
    }
}
