//! Headless scenarios for the suggestion list.

use super::common::run_events;

#[test]
fn test_suggestions_appear_after_quiet_period() {
    let (code, stdout) = run_events(
        "type:Par,assert:state:fetch_count=0,assert:not-contains:Parma,\
         wait:500ms,assert:state:fetch_count=1,assert:state:last_fetch=Par,\
         assert:contains:Parma,assert:state:suggestion_count=4,assert:state:selected=0",
    );

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Assertions: 7 passed, 0 failed"));
}

#[test]
fn test_keyboard_navigation_clamps() {
    let (code, stdout) = run_events(
        "type:Paris,wait:500ms,key:up,assert:state:selected=0,\
         key:down,key:down,key:down,key:down,assert:state:selected=2,\
         key:enter,assert:state:chosen=place.paris-tn,assert:state:list_visible=false",
    );

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Paris, Tennessee, United States"));
}

#[test]
fn test_escape_clears_query_and_list() {
    let (code, stdout) = run_events(
        "type:Lon,wait:500ms,assert:state:list_visible=true,\
         key:esc,assert:state:query=,assert:state:suggestion_count=0,\
         assert:state:selected=none,assert:state:list_visible=false,\
         wait:1s,assert:state:fetch_count=1",
    );

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_pointer_hover_leave_click() {
    let (code, stdout) = run_events(
        "type:Paris,wait:500ms,hover:1,assert:state:selected=1,\
         leave:1,assert:state:selected=none,key:enter,assert:state:chosen=none,\
         click:2,assert:state:chosen=place.paris-tn",
    );

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_blur_hides_and_focus_resets_selection() {
    let (code, stdout) = run_events(
        "type:Paris,wait:500ms,key:down,assert:state:selected=1,\
         blur,assert:state:list_visible=false,assert:state:selected=1,\
         focus,assert:state:list_visible=true,assert:state:selected=0",
    );

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_tab_and_slash_move_focus() {
    let (code, stdout) = run_events(
        "key:tab,assert:state:focus=place,type:/,assert:state:focus=search,\
         assert:state:query=,type:Lyon,assert:state:query=Lyon",
    );

    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_quit_with_ctrl_c() {
    let (code, stdout) = run_events("key:ctrl+c,type:ignored");

    assert_eq!(code, 0);
    assert!(stdout.contains("Events: 1 executed"));
}

#[test]
fn test_non_ascii_query() {
    let (code, stdout) = run_events(
        "type:São,wait:500ms,assert:state:last_fetch=São,assert:contains:São Paulo,\
         key:enter,assert:state:chosen=place.sao-paulo",
    );

    assert_eq!(code, 0, "{stdout}");
}
