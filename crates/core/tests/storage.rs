use jokerscore_core::arena::{Arena, ArenaError, Handle};
use jokerscore_core::list::PoolList;

#[test]
fn arena_fills_lowest_free_slot_first() {
    let mut arena: Arena<u32> = Arena::with_capacity(8);
    let handles: Vec<_> = (0..8)
        .map(|n| arena.acquire(n).expect("slot available"))
        .collect();
    assert!(arena.is_full());
    assert_eq!(
        arena.acquire(99),
        Err(ArenaError::Exhausted { capacity: 8 })
    );

    assert_eq!(arena.release(handles[3]), Ok(3));
    assert_eq!(arena.len(), 7);
    let reused = arena.acquire(42).expect("released slot");
    assert_eq!(reused.index(), 3);
    assert_eq!(arena.resolve(reused), Ok(&42));
}

#[test]
fn released_slot_is_no_longer_resolvable() {
    let mut arena: Arena<String> = Arena::with_capacity(4);
    let handle = arena.acquire("blueprint".to_string()).expect("acquire");
    assert_eq!(arena.release(handle).as_deref(), Ok("blueprint"));
    assert_eq!(
        arena.resolve(handle),
        Err(ArenaError::NotLive { index: 0 })
    );
    assert_eq!(
        arena.release(handle),
        Err(ArenaError::NotLive { index: 0 })
    );
}

#[test]
fn out_of_range_handle_is_rejected() {
    let arena: Arena<u8> = Arena::with_capacity(2);
    let handle = Handle::from_index(5);
    assert_eq!(
        arena.resolve(handle),
        Err(ArenaError::OutOfRange {
            index: 5,
            capacity: 2
        })
    );
}

#[test]
fn acquire_release_round_trip_keeps_counts() {
    let mut arena: Arena<u16> = Arena::with_capacity(32);
    for round in 0..3u16 {
        let handles: Vec<_> = (0..32)
            .map(|n| arena.acquire(round * 100 + n).expect("acquire"))
            .collect();
        assert_eq!(arena.len(), 32);
        for handle in handles {
            arena.release(handle).expect("release");
        }
        assert!(arena.is_empty());
    }
}

#[test]
fn list_keeps_insertion_order_at_both_ends() {
    let mut list = PoolList::with_capacity(8);
    list.push_back(2).expect("push");
    list.push_back(3).expect("push");
    list.push_front(1).expect("push");
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(list.get_at_index(2), Some(3));
    assert_eq!(list.get_at_index(3), None);
    assert_eq!(list.position_of(2), Some(1));
}

#[test]
fn list_push_fails_when_pool_is_exhausted() {
    let mut list = PoolList::with_capacity(2);
    list.push_back(1).expect("push");
    list.push_back(2).expect("push");
    assert!(list.is_full());
    assert_eq!(
        list.push_back(3),
        Err(ArenaError::Exhausted { capacity: 2 })
    );
    assert_eq!(list.len(), 2);
}

#[test]
fn removing_the_yielded_node_mid_walk_visits_every_value_once() {
    let mut list = PoolList::with_capacity(8);
    for value in 0..6 {
        list.push_back(value).expect("push");
    }

    let mut cursor = list.cursor();
    let mut visited = Vec::new();
    while let Some((node, value)) = cursor.next(&list) {
        visited.push(value);
        if value % 2 == 0 {
            list.remove_node(node).expect("remove yielded node");
        }
    }

    assert_eq!(visited, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    assert!(cursor.is_done());
}

#[test]
fn freed_nodes_are_reused() {
    let mut list = PoolList::with_capacity(3);
    for value in [10, 20, 30] {
        list.push_back(value).expect("push");
    }
    assert_eq!(list.remove_at_index(1), Ok(Some(20)));
    assert_eq!(list.remove_at_index(5), Ok(None));
    list.push_back(40).expect("slot freed by removal");
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![10, 30, 40]);
    assert_eq!(list.remove_value(99), Ok(None));
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    for value in [1, 2, 3] {
        list.push_back(value).expect("clear frees every node");
    }
}
