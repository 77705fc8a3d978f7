use desktop_runtime::{
    persistence::load_saved_position, AppKind, Desktop, DesktopAction, DesktopConfig,
    DesktopError, DesktopShortcut, DropOutcome, FsError, HeaderHit, IconId, PercentPosition,
    PointerPosition, SizeSpec, VirtualFileSystem, WindowKey, WindowRect,
};
use platform_host::{HostServices, KeyValueStore, MemoryKeyValueStore};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn desktop_with(store: &MemoryKeyValueStore) -> Desktop {
    let mut desktop = Desktop::new(
        DesktopConfig::default(),
        HostServices::in_memory(store.clone()),
        WindowRect::viewport(1000, 840),
    );
    desktop
        .initialize(&[DesktopShortcut::new("notepad", "Notepad")])
        .unwrap();
    desktop
}

/// Notepad at (5, 5) and a `Games` folder icon directly below it at (5, 110).
fn desktop_with_folder(store: &MemoryKeyValueStore) -> Desktop {
    let mut desktop = desktop_with(store);
    desktop.new_folder("Games").unwrap();
    desktop.run_animation_frame();
    desktop
}

fn pixels(desktop: &Desktop, id: &IconId) -> (f64, f64) {
    let position = desktop.icons().get(id).unwrap().position;
    (position.left_px, position.top_px)
}

#[test]
fn startup_places_shortcuts_and_folder_icons() {
    let store = MemoryKeyValueStore::default();
    let desktop = desktop_with_folder(&store);
    let notepad = IconId::for_app("Notepad");
    let games = IconId::for_folder("Games");

    assert_eq!(pixels(&desktop, &notepad), (5.0, 5.0));
    assert_eq!(pixels(&desktop, &games), (5.0, 110.0));
    assert!(desktop.vfs().is_file(&["Desktop"], "Notepad.desktop"));
    assert!(!desktop.has_pending_work());
}

#[test]
fn dragging_icon_onto_folder_moves_backing_file() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with_folder(&store);
    let notepad = IconId::for_app("Notepad");
    let games = IconId::for_folder("Games");

    desktop.icon_pointer_down(&notepad, false).unwrap();
    desktop.begin_icon_drag(&notepad, 40.0, 50.0).unwrap();
    desktop.update_icon_drag(40.0, 160.0);
    assert_eq!(desktop.drag_target(), Some(&games));
    assert!(desktop.icons().get(&games).unwrap().highlighted);

    let outcome = desktop.end_icon_drag().unwrap();
    assert_eq!(
        outcome,
        DropOutcome::MovedToFolder {
            folder: "Games".to_string(),
            moved: vec![notepad.clone()],
            rejected: Vec::new(),
            unsaved: None,
        }
    );
    assert!(desktop.vfs().is_file(&["Desktop", "Games"], "Notepad.desktop"));
    assert!(!desktop.vfs().is_file(&["Desktop"], "Notepad.desktop"));
    assert!(!desktop.icons().contains(&notepad));
    assert!(desktop.selection().is_empty());
    assert!(!desktop.icons().get(&games).unwrap().highlighted);
}

#[test]
fn drop_conflict_keeps_icon_selected_and_snapped() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with_folder(&store);
    desktop
        .vfs_mut()
        .create_file(&["Desktop", "Games"], "Notepad.desktop", "older")
        .unwrap();
    let notepad = IconId::for_app("Notepad");

    desktop.icon_pointer_down(&notepad, false).unwrap();
    desktop.begin_icon_drag(&notepad, 40.0, 50.0).unwrap();
    desktop.update_icon_drag(40.0, 160.0);
    let outcome = desktop.end_icon_drag().unwrap();

    let DropOutcome::MovedToFolder { moved, rejected, .. } = outcome else {
        panic!("expected a folder drop, got {outcome:?}");
    };
    assert!(moved.is_empty());
    assert_eq!(
        rejected,
        vec![(
            notepad.clone(),
            DesktopError::Fs(FsError::AlreadyExists {
                name: "Notepad.desktop".to_string()
            })
        )]
    );
    assert!(desktop.vfs().is_file(&["Desktop"], "Notepad.desktop"));
    assert_eq!(
        desktop
            .vfs()
            .get_file_content(&["Desktop", "Games"], "Notepad.desktop"),
        Ok("older")
    );
    assert!(desktop.selection().has(&notepad));
    assert_eq!(pixels(&desktop, &notepad), (5.0, 215.0));
}

/// Column of four icons: Notepad (5, 5), Games (5, 110), Photos (5, 215), This PC (5, 320).
fn desktop_with_two_folders(store: &MemoryKeyValueStore) -> Desktop {
    let mut desktop = Desktop::new(
        DesktopConfig::default(),
        HostServices::in_memory(store.clone()),
        WindowRect::viewport(1000, 840),
    );
    desktop
        .initialize(&[
            DesktopShortcut::new("notepad", "Notepad"),
            DesktopShortcut::new("explorer", "This PC"),
        ])
        .unwrap();
    desktop.new_folder("Games").unwrap();
    desktop.new_folder("Photos").unwrap();
    desktop.run_animation_frame();
    desktop
}

#[test]
fn multi_icon_drop_moves_each_icon_independently() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with_two_folders(&store);
    let notepad = IconId::for_app("Notepad");
    let this_pc = IconId::for_app("This PC");
    let games = IconId::for_folder("Games");
    let photos = IconId::for_folder("Photos");
    assert_eq!(pixels(&desktop, &this_pc), (5.0, 320.0));
    desktop
        .vfs_mut()
        .create_file(&["Desktop", "Games"], "This PC.desktop", "older")
        .unwrap();

    desktop.icon_pointer_down(&notepad, false).unwrap();
    desktop.icon_pointer_down(&this_pc, true).unwrap();
    desktop.icon_pointer_down(&photos, true).unwrap();
    desktop.begin_icon_drag(&notepad, 40.0, 50.0).unwrap();
    desktop.update_icon_drag(40.0, 160.0);

    assert_eq!(pixels(&desktop, &notepad), (5.0, 115.0));
    assert_eq!(pixels(&desktop, &photos), (5.0, 325.0));
    assert_eq!(pixels(&desktop, &this_pc), (5.0, 430.0));
    assert_eq!(desktop.drag_target(), Some(&games));

    let outcome = desktop.end_icon_drag().unwrap();
    assert_eq!(
        outcome,
        DropOutcome::MovedToFolder {
            folder: "Games".to_string(),
            moved: vec![notepad.clone()],
            rejected: vec![(
                this_pc.clone(),
                DesktopError::Fs(FsError::AlreadyExists {
                    name: "This PC.desktop".to_string()
                })
            )],
            unsaved: None,
        }
    );

    assert!(desktop.vfs().is_file(&["Desktop", "Games"], "Notepad.desktop"));
    assert!(desktop.vfs().is_file(&["Desktop"], "This PC.desktop"));
    assert!(desktop.vfs().get_folder(&["Desktop", "Photos"]).is_ok());
    assert!(!desktop.icons().contains(&notepad));
    assert_eq!(desktop.selection().to_array(), vec![this_pc.clone()]);
    assert!(!desktop.icons().get(&photos).unwrap().selected);

    assert_eq!(pixels(&desktop, &photos), (5.0, 320.0));
    assert_eq!(pixels(&desktop, &this_pc), (5.0, 425.0));
    assert_eq!(
        load_saved_position(&store, "Desktop/This PC.desktop"),
        Some(PercentPosition {
            left_percent: 0.5,
            top_percent: 53.125
        })
    );
    assert_eq!(
        load_saved_position(&store, "Desktop/.Photos.folder"),
        Some(PercentPosition {
            left_percent: 0.5,
            top_percent: 40.0
        })
    );
    assert_eq!(load_saved_position(&store, "Desktop/Notepad.desktop"), None);

    let mut reloaded = Desktop::new(
        DesktopConfig::default(),
        HostServices::in_memory(store.clone()),
        WindowRect::viewport(1000, 840),
    );
    reloaded
        .initialize(&[
            DesktopShortcut::new("notepad", "Notepad"),
            DesktopShortcut::new("explorer", "This PC"),
        ])
        .unwrap();
    assert_eq!(pixels(&reloaded, &photos), (5.0, 320.0));
    assert_eq!(pixels(&reloaded, &this_pc), (5.0, 425.0));
}

#[test]
fn drop_on_empty_desktop_snaps_and_restores_after_reload() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with_folder(&store);
    let notepad = IconId::for_app("Notepad");

    desktop.icon_pointer_down(&notepad, false).unwrap();
    desktop.begin_icon_drag(&notepad, 40.0, 50.0).unwrap();
    desktop.update_icon_drag(340.0, 250.0);
    assert_eq!(desktop.drag_target(), None);
    assert_eq!(
        desktop.end_icon_drag().unwrap(),
        DropOutcome::Snapped {
            icons: vec![notepad.clone()]
        }
    );
    assert_eq!(pixels(&desktop, &notepad), (345.0, 215.0));
    assert!(store.load("Desktop/Notepad.desktop").unwrap().is_some());

    let reloaded = desktop_with(&store);
    let (left, top) = pixels(&reloaded, &notepad);
    assert!((left - 345.0).abs() < 1e-9);
    assert!((top - 215.0).abs() < 1e-9);
    assert!(!reloaded.has_pending_work());
}

#[test]
fn icon_drag_never_crosses_top_left_edge() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with_folder(&store);
    let notepad = IconId::for_app("Notepad");

    desktop.icon_pointer_down(&notepad, false).unwrap();
    desktop.begin_icon_drag(&notepad, 40.0, 50.0).unwrap();
    desktop.update_icon_drag(0.0, 0.0);
    assert_eq!(pixels(&desktop, &notepad), (0.0, 0.0));
    assert_eq!(desktop.end_icon_drag(), Ok(DropOutcome::Snapped { icons: vec![notepad] }));
    assert_eq!(desktop.end_icon_drag(), Ok(DropOutcome::Ignored));
}

#[test]
fn viewport_resize_repositions_after_quiet_interval() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with_folder(&store);
    let notepad = IconId::for_app("Notepad");
    desktop.icon_pointer_down(&notepad, false).unwrap();
    desktop.begin_icon_drag(&notepad, 40.0, 50.0).unwrap();
    desktop.update_icon_drag(340.0, 250.0);
    desktop.end_icon_drag().unwrap();

    desktop.viewport_resized(WindowRect::viewport(1800, 1040));
    desktop.advance_clock(60);
    desktop.viewport_resized(WindowRect::viewport(2000, 1640));
    desktop.advance_clock(60);
    assert_eq!(pixels(&desktop, &notepad), (345.0, 215.0));
    assert!(desktop.has_pending_work());

    desktop.advance_clock(40);
    assert_eq!(pixels(&desktop, &notepad), (685.0, 425.0));
    assert!(!desktop.has_pending_work());
}

#[test]
fn reopening_a_window_focuses_instead_of_duplicating() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with(&store);
    let notes = WindowKey::instance(AppKind::Notepad, "notes.txt");
    let explorer = WindowKey::app(AppKind::Explorer);

    desktop
        .open_window(notes.clone(), "notes.txt", SizeSpec::Auto, SizeSpec::Auto)
        .unwrap();
    desktop
        .open_window(explorer.clone(), "Explorer", SizeSpec::Auto, SizeSpec::Auto)
        .unwrap();
    desktop
        .open_window(notes.clone(), "notes.txt", SizeSpec::Auto, SizeSpec::Auto)
        .unwrap();

    assert_eq!(desktop.state().windows.len(), 2);
    assert_eq!(desktop.state().taskbar.len(), 2);
    assert_eq!(desktop.state().focused_window(), Some(&notes));
    assert_eq!(desktop.state().stacking_order(), vec![explorer, notes]);
}

#[test]
fn window_drag_blocks_box_selection() {
    let store = MemoryKeyValueStore::default();
    let mut desktop = desktop_with(&store);
    let browser = WindowKey::app(AppKind::Browser);
    desktop
        .open_window(browser.clone(), "Browser", SizeSpec::Pixels(400.0), SizeSpec::Pixels(300.0))
        .unwrap();
    desktop
        .dispatch(DesktopAction::BeginMove {
            window: browser.clone(),
            pointer: PointerPosition { x: 400, y: 280 },
            hit: HeaderHit::Title,
        })
        .unwrap();

    assert!(!desktop.begin_box_select(10.0, 10.0, true));

    desktop.dispatch(DesktopAction::EndMove).unwrap();
    assert!(desktop.begin_box_select(10.0, 10.0, true));
}

#[test]
fn filesystem_survives_reload_from_the_same_store() {
    let store = MemoryKeyValueStore::default();
    {
        let mut desktop = desktop_with(&store);
        let projects = ["home", "reeyuki", "Documents", "Projects"];
        desktop
            .vfs_mut()
            .create_folder(&["home", "reeyuki", "Documents"], "Projects")
            .unwrap();
        desktop
            .vfs_mut()
            .create_file(&projects, "notes.txt", "hello")
            .unwrap();
    }

    let reloaded = VirtualFileSystem::load(Rc::new(store.clone()), "desktopOS_fileSystem");
    let projects = ["home", "reeyuki", "Documents", "Projects"];
    assert_eq!(reloaded.get_file_content(&projects, "notes.txt"), Ok("hello"));
    assert_eq!(
        reloaded.get_file_kind(&projects, "notes.txt").map(|kind| kind.as_str()),
        Ok("text")
    );
    assert!(reloaded.is_file(&["Desktop"], "Notepad.desktop"));
}
