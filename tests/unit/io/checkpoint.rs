//! Tests for checkpoint naming, parsing and validation

#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::TempDir;
    use tessellate::TessellationError;
    use tessellate::io::checkpoint::{checkpoint_path, find_checkpoints, load_seeds, write_seeds};
    use tessellate::tessellation::segment::SeedPoint;

    fn seeds() -> Vec<SeedPoint> {
        vec![
            SeedPoint {
                id: 0,
                position: [1.5, 2.25],
            },
            SeedPoint {
                id: 3,
                position: [0.1 + 0.2, -7.0],
            },
        ]
    }

    // Tests checkpoint file naming
    // Verified by dropping the region index
    #[test]
    fn test_checkpoint_path() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            checkpoint_path(dir.path(), 12),
            dir.path().join("segment_12.points.txt")
        );
    }

    // Tests written seeds reload exactly
    // Verified by formatting with six decimals
    #[test]
    fn test_write_then_load_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("segment_0.points.txt");
        write_seeds(&path, &seeds()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("0\t1.5\t2.25\n"));
        assert_eq!(load_seeds(&path, 2).unwrap(), seeds());
    }

    // Tests wrong seed counts are rejected
    // Verified by accepting fewer seeds than expected
    #[test]
    fn test_load_count_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("segment_0.points.txt");
        write_seeds(&path, &seeds()).unwrap();

        let result = load_seeds(&path, 3);
        assert!(matches!(
            result,
            Err(TessellationError::SeedCountMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    // Tests malformed lines report their line number
    // Verified by counting lines from zero
    #[test]
    fn test_load_malformed_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.points.txt");
        fs::write(&path, "0\t1.0\t2.0\n\n1\tabc\t2.0\n").unwrap();

        let result = load_seeds(&path, 2);
        assert!(matches!(
            result,
            Err(TessellationError::Parse { line: 3, .. })
        ));
    }

    // Tests missing fields and infinite coordinates are rejected
    // Verified by defaulting missing coordinates to zero
    #[test]
    fn test_load_rejects_short_and_infinite() {
        let dir = TempDir::new().unwrap();
        let short = dir.path().join("short.txt");
        fs::write(&short, "0\t1.0\n").unwrap();
        assert!(load_seeds(&short, 1).is_err());

        let infinite = dir.path().join("inf.txt");
        fs::write(&infinite, "0\tinf\t1.0\n").unwrap();
        assert!(load_seeds(&infinite, 1).is_err());
    }

    // Tests repeated ids are rejected
    // Verified by keeping the last duplicate
    #[test]
    fn test_load_duplicate_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dup.txt");
        fs::write(&path, "4 1.0 1.0\n4 2.0 2.0\n").unwrap();

        let result = load_seeds(&path, 2);
        assert!(matches!(
            result,
            Err(TessellationError::DuplicateSeed { id: 4, .. })
        ));
    }

    // Tests missing files report a file system error
    // Verified by treating a missing file as empty
    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_seeds(&dir.path().join("none.txt"), 1);
        assert!(matches!(
            result,
            Err(TessellationError::FileSystem { .. })
        ));
    }

    // Tests checkpoint discovery needs the complete set
    // Verified by returning the files that exist
    #[test]
    fn test_find_checkpoints() {
        let dir = TempDir::new().unwrap();
        assert!(find_checkpoints(dir.path(), 2).is_none());

        write_seeds(&checkpoint_path(dir.path(), 0), &seeds()).unwrap();
        assert!(find_checkpoints(dir.path(), 2).is_none());

        write_seeds(&checkpoint_path(dir.path(), 1), &seeds()).unwrap();
        let found = find_checkpoints(dir.path(), 2).unwrap();
        assert_eq!(found.len(), 2);
        assert!(find_checkpoints(dir.path(), 0).is_none());
    }
}
