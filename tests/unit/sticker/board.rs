use super::*;

#[test]
fn add_uses_defaults_and_stacks_on_top() {
    let mut b = StickerBoard::new();
    let a = b.add("stickers/star.png", "star").unwrap();
    let c = b.add("stickers/heart.png", "heart").unwrap();
    let s = b.get(&a).unwrap();
    assert_eq!((s.x, s.y), DEFAULT_STICKER_POS);
    assert_eq!((s.width, s.height), (80.0, 80.0));
    assert_eq!(s.z_index, 1);
    assert_eq!(b.get(&c).unwrap().z_index, 2);
    assert_ne!(a, c);
    let order: Vec<_> = b.draw_order().iter().map(|s| s.id.clone()).collect();
    assert_eq!(order, vec![a, c]);
}

#[test]
fn add_with_rejects_invalid_geometry() {
    let mut b = StickerBoard::new();
    let err = b
        .add_with(NewSticker::new("x.png", "x").size(0.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, StripError::Validation(_)));
    assert!(b.is_empty());
}

#[test]
fn drag_moves_by_pointer_delta_without_clamping() {
    let mut b = StickerBoard::new();
    let id = b.add("s.png", "s").unwrap();
    b.begin_drag(&id, Point::new(50.0, 50.0)).unwrap();
    assert_eq!(b.selected(), Some(&id));
    assert!(b.drag_to(Point::new(60.0, 45.0)));
    assert!(b.drag_to(Point::new(-200.0, 45.0)));
    let s = b.get(&id).unwrap();
    assert_eq!((s.x, s.y), (20.0 - 250.0, 15.0));
    b.end_drag();
    assert!(!b.drag_to(Point::new(0.0, 0.0)));
}

#[test]
fn arrow_keys_nudge_selected_only() {
    let mut b = StickerBoard::new();
    let id = b.add("s.png", "s").unwrap();
    assert!(!b.handle_key(StickerKey::ArrowRight));
    assert_eq!(b.get(&id).unwrap().x, 20.0);

    b.select(&id).unwrap();
    assert!(b.handle_key(StickerKey::ArrowRight));
    assert!(b.handle_key(StickerKey::ArrowUp));
    assert!(b.handle_key(StickerKey::ArrowUp));
    let s = b.get(&id).unwrap();
    assert_eq!((s.x, s.y), (25.0, 10.0));
}

#[test]
fn delete_key_removes_and_clears_selection() {
    let mut b = StickerBoard::new();
    let keep = b.add("a.png", "a").unwrap();
    let gone = b.add("b.png", "b").unwrap();
    b.select(&gone).unwrap();
    assert!(b.handle_key(StickerKey::Backspace));
    assert!(b.get(&gone).is_none());
    assert!(b.selected().is_none());
    assert!(b.get(&keep).is_some());
    assert!(!b.handle_key(StickerKey::Delete));
    assert_eq!(b.len(), 1);
}

#[test]
fn update_patches_and_validates() {
    let mut b = StickerBoard::new();
    let id = b.add("s.png", "s").unwrap();
    b.update(
        &id,
        StickerPatch {
            rotation_deg: Some(45.0),
            width: Some(120.0),
            ..StickerPatch::default()
        },
    )
    .unwrap();
    let s = b.get(&id).unwrap();
    assert_eq!(s.rotation_deg, 45.0);
    assert_eq!(s.width, 120.0);
    assert_eq!(s.height, 80.0);

    let bad = StickerPatch {
        height: Some(-1.0),
        ..StickerPatch::default()
    };
    assert!(b.update(&id, bad).is_err());
    assert_eq!(b.get(&id).unwrap().height, 80.0);

    let missing = StickerId::new("nope").unwrap();
    assert!(b.update(&missing, StickerPatch::default()).is_err());
}

#[test]
fn bring_to_front_raises_above_all() {
    let mut b = StickerBoard::new();
    let a = b.add("a.png", "a").unwrap();
    let _ = b.add("b.png", "b").unwrap();
    let _ = b.add_with(NewSticker::new("c.png", "c").z(10)).unwrap();
    b.bring_to_front(&a).unwrap();
    assert_eq!(b.get(&a).unwrap().z_index, 11);
    assert_eq!(b.draw_order().last().unwrap().id, a);
}

#[test]
fn removed_ids_are_not_reused() {
    let mut b = StickerBoard::new();
    let a = b.add("a.png", "a").unwrap();
    b.remove(&a).unwrap();
    let c = b.add("c.png", "c").unwrap();
    assert_ne!(a, c);
}

#[test]
fn from_stickers_rejects_duplicates_and_mints_fresh_ids() {
    let mut b = StickerBoard::new();
    let a = b.add("a.png", "a").unwrap();
    let snapshot = b.to_vec();

    let mut dup = snapshot.clone();
    dup.push(snapshot[0].clone());
    assert!(StickerBoard::from_stickers(dup).is_err());

    let mut restored = StickerBoard::from_stickers(snapshot).unwrap();
    let c = restored.add("c.png", "c").unwrap();
    assert_ne!(a, c);
    assert_eq!(restored.len(), 2);
}

#[test]
fn mailbox_applies_commands_in_arrival_order() {
    let mut b = StickerBoard::new();
    let mailbox = StickerMailbox::new();
    let tx = mailbox.sender();
    let handle = std::thread::spawn(move || {
        tx.send(StickerCommand::Add(NewSticker::new("a.png", "a").at(0.0, 0.0)))
            .unwrap();
        tx.send(StickerCommand::Select(Some(StickerId::new("sticker-1").unwrap())))
            .unwrap();
        tx.send(StickerCommand::Key(StickerKey::ArrowDown)).unwrap();
        tx.send(StickerCommand::Remove(StickerId::new("missing").unwrap()))
            .unwrap();
        tx.send(StickerCommand::BringToFront(StickerId::new("missing").unwrap()))
            .unwrap();
    });
    handle.join().unwrap();

    assert_eq!(b.drain(&mailbox), 4);
    let s = b.get(&StickerId::new("sticker-1").unwrap()).unwrap();
    assert_eq!((s.x, s.y), (0.0, 5.0));
    assert_eq!(b.drain(&mailbox), 0);
}
