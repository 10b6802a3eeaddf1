use std::io::Write;

use mutwick::Error;
use mutwick::clades::{CladeAssignment, load_clades, load_clades_file};
use mutwick::parser::{ParsingError, ParsingErrorType};

fn parsing_error(input: &[u8]) -> ParsingError {
    match load_clades(input) {
        Err(Error::Parsing(err)) => err,
        other => panic!("expected a parsing error, got {other:?}"),
    }
}

#[test]
fn test_plain_and_uncertain_assignments() {
    let input = "\
England/MILK-9E05B3/2020\tB.1.1.7
Wales/ALDP-11CD16/2020\tB.1.1.161*|B.1.1(2/3),B.1.1.161(1/3)

USA/CA-CDC-QDX/2021\tAY.4\r
";
    let clades = load_clades(input.as_bytes()).unwrap();

    assert_eq!(clades.len(), 3);
    assert_eq!(
        clades["England/MILK-9E05B3/2020"],
        CladeAssignment {
            lineage: "B.1.1.7".to_string(),
            lineages: "B.1.1.7".to_string(),
        }
    );
    assert_eq!(clades["Wales/ALDP-11CD16/2020"].lineage, "B.1.1.161");
    assert_eq!(clades["Wales/ALDP-11CD16/2020"].lineages, "B.1.1,B.1.1.161");
    assert_eq!(clades["USA/CA-CDC-QDX/2021"].lineage, "AY.4");
}

#[test]
fn test_later_line_wins() {
    let clades = load_clades("s1\tA\ns1\tB\n".as_bytes()).unwrap();
    assert_eq!(clades["s1"].lineage, "B");
}

#[test]
fn test_invalid_lines() {
    for input in ["s1 B.1\n", "s1\tB.1*\n", "s1\tB.1|B.2\n", "s1\t\n", "s1\t*|B.1(1/1)\n"] {
        let err = parsing_error(input.as_bytes());
        assert!(
            matches!(err.kind(), ParsingErrorType::InvalidCladeLine(_)),
            "{input:?} gave {err}"
        );
    }
}

#[test]
fn test_error_position_is_line_offset() {
    let err = parsing_error("s1\tA\ns2 B\n".as_bytes());
    assert_eq!(err.position(), 5);
}

#[test]
fn test_read_failure_keeps_io_error() {
    let err = load_clades(&b"s1\tA\ns2\t\xff\n"[..]).unwrap_err();
    match err {
        Error::Io(err) => assert_eq!(err.kind(), std::io::ErrorKind::InvalidData),
        other => panic!("expected an IO error, got {other:?}"),
    }
}

#[test]
fn test_load_clades_file() {
    let path = std::env::temp_dir().join(format!("mutwick-clades-{}.tsv", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "s1\tB.1").unwrap();
    drop(file);

    let clades = load_clades_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(clades["s1"].lineages, "B.1");
    assert!(load_clades_file(&path).is_err());
}
