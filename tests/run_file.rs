mod common;

use common::Sandbox;
use predicates::prelude::*;

#[test]
fn runs_program_from_file() {
    // 8 * 8 + 1 = 65 = 'A'
    let sb = Sandbox::new();
    let path = sb.program("++++++++[>++++++++<-]>+.");
    sb.bf()
        .arg(&path)
        .assert()
        .success()
        .stdout("A")
        .stderr(predicate::str::is_empty());
}

#[test]
fn comments_in_source_are_ignored() {
    let sb = Sandbox::new();
    let path = sb.program("print three bytes:\n+. +. +.\n# done\n");
    sb.bf()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::eq(&[1u8, 2, 3][..]));
}

#[test]
fn hello_world() {
    let sb = Sandbox::new();
    let path = sb.program(
        "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.",
    );
    sb.bf()
        .arg(&path)
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn empty_program_produces_no_output() {
    let sb = Sandbox::new();
    let path = sb.program("nothing to see here");
    sb.bf()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
