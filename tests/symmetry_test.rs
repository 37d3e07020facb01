use crossword::error::CrosswordError;
use crossword::symmetry::{SymmetryFlags, SymmetryMode, affected_cells};

fn cells(index: usize, size: usize, mode: SymmetryMode) -> Vec<usize> {
    affected_cells(index, size, mode.flags())
        .unwrap()
        .into_iter()
        .collect()
}

#[test]
fn modes_map_to_flags() {
    assert_eq!(
        SymmetryMode::All.flags(),
        SymmetryFlags { rotational: true, horizontal: true, vertical: true }
    );
    assert_eq!(SymmetryMode::None.flags(), SymmetryFlags::default());
    assert_eq!(
        SymmetryMode::Rotational.flags(),
        SymmetryFlags { rotational: true, horizontal: false, vertical: false }
    );
    assert_eq!(
        SymmetryMode::Horizontal.flags(),
        SymmetryFlags { rotational: false, horizontal: true, vertical: false }
    );
    assert_eq!(
        SymmetryMode::Vertical.flags(),
        SymmetryFlags { rotational: false, horizontal: false, vertical: true }
    );
    println!("✓ Every mode yields its flag triple");
}

#[test]
fn tokens_parse_strictly_and_leniently() {
    for (token, mode) in [
        ("r", SymmetryMode::Rotational),
        ("H", SymmetryMode::Horizontal),
        ("v", SymmetryMode::Vertical),
        ("ALL", SymmetryMode::All),
        ("none", SymmetryMode::None),
    ] {
        assert_eq!(token.parse::<SymmetryMode>().unwrap(), mode);
        assert_eq!(mode.token().parse::<SymmetryMode>().unwrap(), mode);
    }

    assert!(matches!(
        "diagonal".parse::<SymmetryMode>(),
        Err(CrosswordError::InvalidSymmetryMode(_))
    ));
    assert_eq!(
        SymmetryMode::from_param_lenient(Some("diagonal"), SymmetryMode::None),
        SymmetryMode::None
    );
    assert_eq!(
        SymmetryMode::from_param_lenient(None, SymmetryMode::Rotational),
        SymmetryMode::Rotational
    );
    println!("✓ Unknown tokens error strictly and fall back leniently");
}

#[test]
fn corner_under_all_on_four_by_four() {
    assert_eq!(cells(0, 4, SymmetryMode::All), vec![0, 3, 12, 15]);
    println!("✓ (0,0) on 4x4 touches {{0, 3, 12, 15}}");
}

#[test]
fn single_flag_gives_two_cells_or_one_when_fixed() {
    for size in 1..=9 {
        for mode in [SymmetryMode::Rotational, SymmetryMode::Horizontal, SymmetryMode::Vertical] {
            for i in 0..size * size {
                let (r, c) = (i / size, i % size);
                let self_mapped = match mode {
                    SymmetryMode::Rotational => r == size - 1 - r && c == size - 1 - c,
                    SymmetryMode::Horizontal => r == size - 1 - r,
                    _ => c == size - 1 - c,
                };
                let set = cells(i, size, mode);
                assert_eq!(set.len(), if self_mapped { 1 } else { 2 }, "i={} size={} {:?}", i, size, mode);
                assert!(set.contains(&i));
            }
        }
    }
    println!("✓ Single-flag modes return a pair unless the cell is its own mirror");
}

#[test]
fn all_flags_give_at_most_four() {
    for size in 1..=9 {
        for i in 0..size * size {
            let set = cells(i, size, SymmetryMode::All);
            assert!(set.len() <= 4);
            assert!(!set.is_empty());
        }
        if size % 2 == 1 {
            let centre = (size / 2) * size + size / 2;
            assert_eq!(cells(centre, size, SymmetryMode::All), vec![centre]);
        }
    }
    println!("✓ 'all' never exceeds four cells and fixes the odd-grid centre");
}

#[test]
fn none_is_identity() {
    for i in 0..25 {
        assert_eq!(cells(i, 5, SymmetryMode::None), vec![i]);
    }
    println!("✓ 'none' touches only the clicked cell");
}

#[test]
fn rotation_counterpart_is_opposite_corner() {
    assert_eq!(cells(1, 5, SymmetryMode::Rotational), vec![1, 23]);
    assert_eq!(cells(1, 5, SymmetryMode::Horizontal), vec![1, 21]);
    assert_eq!(cells(1, 5, SymmetryMode::Vertical), vec![1, 3]);
    println!("✓ Counterparts land where expected");
}

#[test]
fn out_of_range_index_fails() {
    match affected_cells(16, 4, SymmetryMode::All.flags()) {
        Err(CrosswordError::InvalidCellIndex { index, cells }) => {
            assert_eq!(index, 16);
            assert_eq!(cells, 16);
        }
        other => panic!("expected InvalidCellIndex, got {:?}", other),
    }
    println!("✓ Index past the grid is rejected");
}

#[test]
fn labels_read_naturally() {
    assert_eq!(SymmetryMode::None.flags().label(), "None");
    assert_eq!(
        SymmetryMode::All.flags().label(),
        "Rotational(180°) + Horizontal + Vertical"
    );
    assert_eq!(SymmetryMode::Vertical.flags().label(), "Vertical");
}

#[test]
fn oversized_grid_fails_cleanly() {
    let huge = usize::MAX >> 1;
    assert!(matches!(
        affected_cells(0, huge, SymmetryMode::All.flags()),
        Err(CrosswordError::GridTooLarge { .. })
    ));
}
