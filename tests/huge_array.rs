use pagegraph::collections::huge_array::{MAX_SIZE, PAGE_SIZE};
use pagegraph::{BuildError, HugeIntArray, HugeLongArray};
use std::thread;

#[test]
fn huge_array_set_get_iter() {
    let array = HugeIntArray::new(100).unwrap();
    assert!(!array.is_empty());
    assert_eq!(array.size(), 100);
    assert_eq!(array.page_count(), 1);

    for i in 0..100u32 {
        array.set(u64::from(i), i * 3);
    }
    assert_eq!(array.get(0), 0);
    assert_eq!(array.get(99), 297);

    let sum: u32 = array.iter().sum();
    assert_eq!(sum, (0..100u32).map(|i| i * 3).sum::<u32>());
}

#[test]
fn huge_array_spans_pages() {
    let size = (PAGE_SIZE * 2 + 7) as u64;
    let array = HugeLongArray::with_default(size, u64::MAX).unwrap();
    assert_eq!(array.page_count(), 3);
    assert_eq!(array.get(size - 1), u64::MAX);

    array.set(PAGE_SIZE as u64, 5);
    assert_eq!(array.get(PAGE_SIZE as u64), 5);
    assert_eq!(array.get(PAGE_SIZE as u64 - 1), u64::MAX);
    assert_eq!(array.iter().filter(|&v| v == 5).count(), 1);
}

#[test]
fn huge_array_rejects_oversized() {
    assert_eq!(
        HugeIntArray::new(MAX_SIZE + 1).err(),
        Some(BuildError::NodeCountOverflow {
            size: MAX_SIZE + 1,
            max: MAX_SIZE
        })
    );
}

#[test]
fn huge_array_disjoint_concurrent_writes() {
    let size = (PAGE_SIZE * 4) as u64;
    let array = HugeLongArray::new(size).unwrap();

    thread::scope(|s| {
        for worker in 0..4u64 {
            let array = &array;
            s.spawn(move || {
                for index in (worker..size).step_by(4) {
                    array.set(index, index * 2);
                }
            });
        }
    });

    assert!(array.iter().enumerate().all(|(i, v)| v == i as u64 * 2));
}

#[test]
fn huge_array_compare_and_set_claims_once() {
    let array = HugeLongArray::with_default(1, u64::MAX).unwrap();
    let winners: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..8u64)
            .map(|worker| {
                let array = &array;
                s.spawn(move || usize::from(array.compare_and_set(0, u64::MAX, worker).is_ok()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });
    assert_eq!(winners, 1);
    assert!(array.get(0) < 8);
}
