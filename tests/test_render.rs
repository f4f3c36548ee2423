use kuinvaders::driver::{Sheet, SpriteRect};
use kuinvaders::render::Sprite;

#[test]
fn sprite_regions_match_sheet_layout() {
    assert_eq!(Sprite::Background.rect(), SpriteRect::new(0.0, 0.0, 1600.0, 900.0));
    assert_eq!(Sprite::Player(2).rect(), SpriteRect::new(280.0, 0.0, 140.0, 220.0));
    assert_eq!(Sprite::Enemy(1).rect(), SpriteRect::new(200.0, 220.0, 200.0, 120.0));
    assert_eq!(Sprite::Beam.rect(), SpriteRect::new(420.0, 0.0, 90.0, 90.0));
    assert_eq!(Sprite::EnemyBeam.rect(), SpriteRect::new(420.0, 90.0, 70.0, 100.0));
}

#[test]
fn sprites_live_on_their_sheets() {
    assert_eq!(Sprite::Title.sheet(), Sheet::Title);
    assert_eq!(Sprite::Background.sheet(), Sheet::Back);
    assert_eq!(Sprite::Enemy(0).sheet(), Sheet::Game);
    assert_eq!(Sprite::EnemyBeam.sheet(), Sheet::Game);
}

#[test]
fn identify_inverts_every_sprite() {
    let all = [
        Sprite::Title,
        Sprite::Background,
        Sprite::Player(0),
        Sprite::Player(1),
        Sprite::Player(2),
        Sprite::Enemy(0),
        Sprite::Enemy(1),
        Sprite::Enemy(2),
        Sprite::Beam,
        Sprite::EnemyBeam,
    ];
    for sprite in all {
        assert_eq!(Sprite::identify(sprite.sheet(), sprite.rect()), Some(sprite));
    }
}

#[test]
fn identify_rejects_unknown_regions() {
    let odd = SpriteRect::new(10.0, 10.0, 5.0, 5.0);
    assert_eq!(Sprite::identify(Sheet::Game, odd), None);
    assert_eq!(Sprite::identify(Sheet::Back, odd), None);
}
