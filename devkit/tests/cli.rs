//! CLI tests: spawn the devkit binary against temp projects and check exit
//! codes, output and filesystem effects.

use std::process::{Command, Output};

use devkit::exit_codes;
use devkit::test_support::{TestProject, example_info};

fn devkit(test: &TestProject, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devkit"))
        .current_dir(test.root())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn devkit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn unknown_example_is_rejected_with_choices() {
    let test = TestProject::new().expect("project");
    test.add_example_template().expect("template");
    test.add_example("hello_world", &example_info("Hello World", ""), &[("main.cpp", "")])
        .expect("example");
    test.add_example("text", &example_info("Text", ""), &[("main.cpp", "")])
        .expect("example");

    let output = devkit(&test, &["example", "nope"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(
        stderr(&output).contains("unknown example 'nope' (choose from: hello_world, text)"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(!test.path("examples/nope").exists());
}

#[test]
fn examples_are_listed_sorted_with_descriptions() {
    let test = TestProject::new().expect("project");
    test.add_example_template().expect("template");
    test.add_example("text", &example_info("Text", ""), &[]).expect("example");
    test.add_example("hello_world", &example_info("Hello World", ""), &[])
        .expect("example");
    test.write("examples/broken/info.json", "not json").expect("write");

    let output = devkit(&test, &["examples"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("broken: (unreadable info.json"));
    assert_eq!(lines[1], "hello_world: Hello World description");
    assert_eq!(lines[2], "text: Text description");
}

#[test]
fn clean_removes_build_outputs() {
    let test = TestProject::new().expect("project");
    test.write("build/build.ninja", "").expect("write");
    test.write("dev/build/dev", "").expect("write");
    test.write("dev/main.cpp", "").expect("write");
    test.add_installed_library(&["libremi.so"]).expect("lib");

    let output = devkit(&test, &["clean"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "clean: build\nclean: dev build\nclean: lib\n");
    assert!(!test.path("build").exists());
    assert!(!test.path("dev/build").exists());
    assert!(!test.path("lib").exists());
    assert!(test.path("dev/main.cpp").exists());

    let again = devkit(&test, &["clean"]);
    assert_eq!(again.status.code(), Some(exit_codes::OK));
}

#[test]
fn gen_options_writes_configured_options() {
    let test = TestProject::new().expect("project");
    test.write(
        "devkit.toml",
        "[[meson_options]]\nname = \"lib\"\ntype = \"string\"\nvalue = \"lib\"\ndescription = \"library installation path\"\n",
    )
    .expect("write");

    let output = devkit(&test, &["gen-options"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK), "{}", stderr(&output));
    assert_eq!(
        test.read("meson.options").expect("read"),
        "option('lib', type : 'string', value : 'lib', description : 'library installation path')\n"
    );
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let test = TestProject::new().expect("project");

    let first = devkit(&test, &["init"]);
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    assert!(test.path("devkit.toml").is_file());

    let second = devkit(&test, &["init"]);
    assert_eq!(second.status.code(), Some(exit_codes::FAILED));
    assert!(stderr(&second).contains("--force"));

    let forced = devkit(&test, &["init", "--force"]);
    assert_eq!(forced.status.code(), Some(exit_codes::OK));
}

#[test]
fn invalid_config_fails_before_any_work() {
    let test = TestProject::new().expect("project");
    test.write("devkit.toml", "[server]\nport = 0\n").expect("write");
    test.mkdir("build").expect("mkdir");

    let output = devkit(&test, &["clean"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILED));
    assert!(stderr(&output).contains("server.port"));
    assert!(test.path("build").exists());
}

#[test]
fn root_is_discovered_from_subdirectory() {
    let test = TestProject::new().expect("project");
    test.write("devkit.toml", "").expect("write");
    test.mkdir("build").expect("mkdir");
    let nested = test.mkdir("dev/src").expect("mkdir");

    let output = Command::new(env!("CARGO_BIN_EXE_devkit"))
        .current_dir(&nested)
        .arg("clean")
        .output()
        .expect("spawn devkit");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(!test.path("build").exists());
}

#[cfg(unix)]
#[test]
fn build_tool_exit_code_is_passed_through() {
    use std::os::unix::fs::PermissionsExt;

    let test = TestProject::new().expect("project");
    let script = test
        .write("fake-meson.sh", "#!/bin/sh\necho \"meson $*\" >&2\nexit 7\n")
        .expect("write");
    let mut perms = std::fs::metadata(&script).expect("meta").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).expect("chmod");
    test.write("devkit.toml", &format!("meson = {:?}\n", script.display().to_string()))
        .expect("write");
    test.mkdir("build").expect("mkdir");

    let output = devkit(&test, &["build"]);

    assert_eq!(output.status.code(), Some(7));
    assert!(stderr(&output).contains("build remi"));
}
