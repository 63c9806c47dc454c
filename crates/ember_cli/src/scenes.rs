//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use ember_core::{CheckerTexture, Color, ImageTexture};
use ember_math::Vec3;
use ember_renderer::{
    random, AxisRect, Camera, ConstantMedium, Cuboid, Dielectric, DiffuseLight, FlipFace,
    Lambertian, Material, Metal, Plane, Rotate, Scene, SceneResult, Shape, ShapeList, Sphere,
    Translate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Diffuse, glass and metal spheres on a checkered ground
    ThreeSpheres,
    /// A field of small random spheres around three large ones
    RandomSpheres,
    /// A sphere lit by an area light and a glowing sphere
    SimpleLight,
    /// An image-textured globe
    Globe,
    /// Cornell box with a tall box and a glass sphere
    Cornell,
    /// Cornell box filled with smoke
    CornellSmoke,
}

/// A scene plus the camera and background it was composed for.
pub struct Demo {
    pub scene: Scene,
    pub camera: Camera,
    pub background: Color,
}

/// Build the demo selected by `kind`. `texture` is only read by the globe.
pub fn build(kind: SceneKind, aspect_ratio: f32, texture: &Path) -> SceneResult<Demo> {
    log::info!("Building scene {:?}", kind);
    let (scene, camera, background) = match kind {
        SceneKind::ThreeSpheres => three_spheres()?,
        SceneKind::RandomSpheres => random_spheres()?,
        SceneKind::SimpleLight => simple_light()?,
        SceneKind::Globe => globe(texture)?,
        SceneKind::Cornell => cornell_box()?,
        SceneKind::CornellSmoke => cornell_smoke()?,
    };

    let mut camera = camera.with_aspect(aspect_ratio);
    camera.initialize();

    Ok(Demo {
        scene,
        camera,
        background,
    })
}

type Composition = (Scene, Camera, Color);

fn look(from: Vec3, at: Vec3, vfov: f32) -> Camera {
    Camera::new()
        .with_position(from, at, Vec3::Y)
        .with_lens(vfov, 1.0)
        .with_aperture(0.0)
}

fn three_spheres() -> SceneResult<Composition> {
    let checker = Arc::new(CheckerTexture::from_colors(Color::ZERO, Color::ONE));

    let shapes: Vec<Arc<dyn Shape>> = vec![
        Arc::new(Sphere::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            Arc::new(Lambertian::new(checker)),
        )),
        Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::from_color(Color::new(0.7, 0.3, 0.3))),
        )),
        Arc::new(Sphere::new(
            Vec3::new(-1.0, 0.0, -1.0),
            0.5,
            Arc::new(Dielectric::new(1.5)),
        )),
        Arc::new(Sphere::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0)),
        )),
    ];

    Ok((
        Scene::build(shapes)?,
        look(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 90.0),
        Color::ZERO,
    ))
}

fn random_spheres() -> SceneResult<Composition> {
    let mut shapes: Vec<Arc<dyn Shape>> = vec![Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_color(Color::new(0.5, 0.8, 0.5))),
    ))];

    let clearing = Vec3::new(4.0, 0.2, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * random::gen_f32(),
                0.2,
                b as f32 + 0.9 * random::gen_f32(),
            );
            if (center - clearing).length() <= 0.9 {
                continue;
            }

            let choose = random::gen_f32();
            let material: Arc<dyn Material> = if choose < 0.8 {
                let albedo = random_color(0.0, 1.0) * random_color(0.0, 1.0);
                Arc::new(Lambertian::from_color(albedo))
            } else if choose < 0.95 {
                Arc::new(Metal::new(
                    random_color(0.5, 1.0),
                    random::gen_range(0.0, 0.5),
                ))
            } else {
                Arc::new(Dielectric::new(1.5))
            };
            shapes.push(Arc::new(Sphere::new(center, 0.2, material)));
        }
    }

    shapes.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    shapes.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_color(Color::new(0.4, 0.2, 0.1))),
    )));
    shapes.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    Ok((
        Scene::build(shapes)?,
        look(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 30.0),
        Color::new(0.8, 0.4, 0.3),
    ))
}

fn random_color(min: f32, max: f32) -> Color {
    Color::new(
        random::gen_range(min, max),
        random::gen_range(min, max),
        random::gen_range(min, max),
    )
}

fn simple_light() -> SceneResult<Composition> {
    let lamp = Arc::new(DiffuseLight::from_color(Color::splat(4.0)));
    let panel: Arc<dyn Shape> = Arc::new(AxisRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, lamp.clone()));
    let bulb: Arc<dyn Shape> = Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 1.0, lamp));

    let shapes: Vec<Arc<dyn Shape>> = vec![
        Arc::new(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Lambertian::from_color(Color::new(0.3, 0.2, 0.8))),
        )),
        Arc::new(Sphere::new(
            Vec3::new(0.0, 2.0, 0.0),
            2.0,
            Arc::new(Lambertian::from_color(Color::new(0.4, 0.6, 0.9))),
        )),
        panel.clone(),
        bulb.clone(),
    ];
    let lights = ShapeList::from(vec![panel, bulb]);

    Ok((
        Scene::build(shapes)?.with_lights(Arc::new(lights)),
        look(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0),
        Color::ZERO,
    ))
}

fn globe(texture: &Path) -> SceneResult<Composition> {
    let earth = Arc::new(ImageTexture::open(texture)?);
    let shapes: Vec<Arc<dyn Shape>> = vec![Arc::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Arc::new(Lambertian::new(earth)),
    ))];

    Ok((
        Scene::build(shapes)?,
        look(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        Color::ONE,
    ))
}

/// Walls and ceiling light shared by both Cornell variants.
///
/// The box spans `x` in `[-278, 278]`, `y` in `[0, 556]` and `z` in
/// `[-556, 0]`, open toward the camera.
fn cornell_shell(shapes: &mut Vec<Arc<dyn Shape>>) -> (Arc<dyn Shape>, Arc<dyn Material>) {
    let red = Arc::new(Lambertian::from_color(Color::new(0.65, 0.05, 0.05)));
    let green = Arc::new(Lambertian::from_color(Color::new(0.12, 0.65, 0.45)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.75)));
    let lamp = Arc::new(DiffuseLight::from_color(Color::splat(16.0)));

    // Facing down into the box
    let light: Arc<dyn Shape> = Arc::new(FlipFace::new(Arc::new(AxisRect::centered(
        Plane::XZ,
        (0.0, 200.0),
        (-278.0, 200.0),
        554.0,
        lamp,
    ))));

    let walls: [Arc<dyn Shape>; 6] = [
        Arc::new(AxisRect::yz(0.0, 556.0, -556.0, 0.0, -278.0, green)),
        Arc::new(AxisRect::yz(0.0, 556.0, -556.0, 0.0, 278.0, red)),
        Arc::new(AxisRect::xy(-278.0, 278.0, 0.0, 556.0, -556.0, white.clone())),
        Arc::new(AxisRect::xz(-278.0, 278.0, -556.0, 0.0, 0.0, white.clone())),
        Arc::new(AxisRect::xz(-278.0, 278.0, -556.0, 0.0, 556.0, white.clone())),
        light.clone(),
    ];
    shapes.extend(walls);

    (light, white)
}

fn placed_box(
    size: Vec3,
    angle: f32,
    offset: Vec3,
    material: Arc<dyn Material>,
) -> Arc<dyn Shape> {
    let cuboid = Arc::new(Cuboid::new(Vec3::ZERO, size, material));
    Arc::new(Translate::new(Arc::new(Rotate::y(cuboid, angle)), offset))
}

fn cornell_camera() -> Camera {
    look(Vec3::new(0.0, 278.0, 800.0), Vec3::new(0.0, 278.0, 0.0), 40.0)
}

fn cornell_box() -> SceneResult<Composition> {
    let mut shapes = Vec::new();
    let (light, white) = cornell_shell(&mut shapes);

    let glass: Arc<dyn Shape> = Arc::new(Sphere::new(
        Vec3::new(100.0, 90.0, -150.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    shapes.push(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        18.0,
        Vec3::new(-152.0, 0.0, -460.0),
        white,
    ));
    shapes.push(glass.clone());

    let lights = ShapeList::from(vec![light, glass]);

    Ok((
        Scene::build(shapes)?.with_lights(Arc::new(lights)),
        cornell_camera(),
        Color::ZERO,
    ))
}

fn cornell_smoke() -> SceneResult<Composition> {
    let mut shapes = Vec::new();
    let (light, white) = cornell_shell(&mut shapes);

    let tall = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        18.0,
        Vec3::new(-152.0, 0.0, -460.0),
        white.clone(),
    );
    let short = placed_box(
        Vec3::new(165.0, 165.0, 165.0),
        -15.0,
        Vec3::new(17.0, 0.0, -230.0),
        white,
    );
    shapes.push(Arc::new(ConstantMedium::from_color(tall, 0.01, Color::ZERO)));
    shapes.push(Arc::new(ConstantMedium::from_color(short, 0.01, Color::ONE)));

    Ok((
        Scene::build(shapes)?.with_lights(light),
        cornell_camera(),
        Color::ZERO,
    ))
}
