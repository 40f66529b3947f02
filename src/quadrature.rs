//! Fixed 64-point quadrature rule on triangles.
//!
//! The rule is a collapsed 8x8 Gauss product rule: sample points are given as
//! barycentric pairs `(b1, b2)` with `b3 = 1 - b1 - b2`, and the weights are
//! normalized to sum to one, so an integral is the triangle area times the
//! weighted sum of samples.

use crate::{
  mesh::{Point, TriangleMesh},
  ElementIdx,
};

pub const NPOINTS: usize = 64;

/// Rows are `[b1, b2, weight]`.
#[rustfmt::skip]
pub const RULE: [[f64; 3]; NPOINTS] = [
  [0.9553660447100000, 0.8862103848242247e-03, 0.3335674062677772e-03],
  [0.9553660447100000, 0.4537789678039195e-02, 0.7327880811491046e-03],
  [0.9553660447100000, 0.1058868260117431e-01, 0.1033723454167925e-02],
  [0.9553660447100000, 0.1822327082910602e-01, 0.1195112498415193e-02],
  [0.9553660447100000, 0.2641068446089399e-01, 0.1195112498415193e-02],
  [0.9553660447100000, 0.3404527268882569e-01, 0.1033723454167925e-02],
  [0.9553660447100000, 0.4009616561196080e-01, 0.7327880811491046e-03],
  [0.9553660447100000, 0.4374774490517578e-01, 0.3335674062677772e-03],
  [0.8556337429600001, 0.2866402391985981e-02, 0.1806210919443461e-02],
  [0.8556337429600001, 0.1467724979327651e-01, 0.3967923151181667e-02],
  [0.8556337429600001, 0.3424855503358430e-01, 0.5597437146194232e-02],
  [0.8556337429600001, 0.5894224214571626e-01, 0.6471331443180639e-02],
  [0.8556337429600001, 0.8542401489428375e-01, 0.6471331443180639e-02],
  [0.8556337429600001, 0.1101177020064157, 0.5597437146194232e-02],
  [0.8556337429600001, 0.1296890072467235, 0.3967923151181667e-02],
  [0.8556337429600001, 0.1414998546480140, 0.1806210919443461e-02],
  [0.7131752428600000, 0.5694926133044352e-02, 0.4599755803015752e-02],
  [0.7131752428600000, 0.2916054411712861e-01, 0.1010484287526739e-01],
  [0.7131752428600000, 0.6804452564827500e-01, 0.1425461651131868e-01],
  [0.7131752428600000, 0.1171055801775613, 0.1648010431039818e-01],
  [0.7131752428600000, 0.1697191769624387, 0.1648010431039818e-01],
  [0.7131752428600000, 0.2187802314917250, 0.1425461651131868e-01],
  [0.7131752428600000, 0.2576642130228714, 0.1010484287526739e-01],
  [0.7131752428600000, 0.2811298310069557, 0.4599755803015752e-02],
  [0.5451866848000000, 0.9030351006711630e-02, 0.8017259531156730e-02],
  [0.5451866848000000, 0.4623939674940125e-01, 0.1761248886287915e-01],
  [0.5451866848000000, 0.1078970888004545, 0.2484544071087993e-01],
  [0.5451866848000000, 0.1856923986620134, 0.2872441038508419e-01],
  [0.5451866848000000, 0.2691209165379867, 0.2872441038508419e-01],
  [0.5451866848000000, 0.3469162263995455, 0.2484544071087993e-01],
  [0.5451866848000000, 0.4085739184505988, 0.1761248886287915e-01],
  [0.5451866848000000, 0.4457829641932884, 0.8017259531156730e-02],
  [0.3719321645800000, 0.1247033193690498e-01, 0.1073501897357062e-01],
  [0.3719321645800000, 0.6385362269957356e-01, 0.2358292149331603e-01],
  [0.3719321645800000, 0.1489989161403976, 0.3326776143412911e-01],
  [0.3719321645800000, 0.2564292182833579, 0.3846165753898425e-01],
  [0.3719321645800000, 0.3716386171366422, 0.3846165753898425e-01],
  [0.3719321645800000, 0.4790689192796024, 0.3326776143412911e-01],
  [0.3719321645800000, 0.5642142127204264, 0.2358292149331603e-01],
  [0.3719321645800000, 0.6155975034830951, 0.1073501897357062e-01],
  [0.2143084794000000, 0.1559996151584746e-01, 0.1138879740452669e-01],
  [0.2143084794000000, 0.7987871227492103e-01, 0.2501915606814251e-01],
  [0.2143084794000000, 0.1863925811641285, 0.3529381699354388e-01],
  [0.2143084794000000, 0.3207842387034378, 0.4080402900378691e-01],
  [0.2143084794000000, 0.4649072818965623, 0.4080402900378691e-01],
  [0.2143084794000000, 0.5992989394358715, 0.3529381699354388e-01],
  [0.2143084794000000, 0.7058128083250790, 0.2501915606814251e-01],
  [0.2143084794000000, 0.7700915590841526, 0.1138879740452669e-01],
  [0.9132360790000005e-01, 0.1804183496379599e-01, 0.9223845391285393e-02],
  [0.9132360790000005e-01, 0.9238218584838476e-01, 0.2026314273544469e-01],
  [0.9132360790000005e-01, 0.2155687489628060, 0.2858464328177232e-01],
  [0.9132360790000005e-01, 0.3709968314854498, 0.3304739223149761e-01],
  [0.9132360790000005e-01, 0.5376795606145502, 0.3304739223149761e-01],
  [0.9132360790000005e-01, 0.6931076431371940, 0.2858464328177232e-01],
  [0.9132360790000005e-01, 0.8162942062516152, 0.2026314273544469e-01],
  [0.9132360790000005e-01, 0.8906345571362040, 0.9223845391285393e-02],
  [0.1777991514999999e-01, 0.1950205026019779e-01, 0.4509812715921713e-02],
  [0.1777991514999999e-01, 0.9985913490381848e-01, 0.9907253959306707e-02],
  [0.1777991514999999e-01, 0.2330157982952792, 0.1397588340693756e-01],
  [0.1777991514999999e-01, 0.4010234473667467, 0.1615785427783403e-01],
  [0.1777991514999999e-01, 0.5811966374832533, 0.1615785427783403e-01],
  [0.1777991514999999e-01, 0.7492042865547208, 0.1397588340693756e-01],
  [0.1777991514999999e-01, 0.8823609499461815, 0.9907253959306707e-02],
  [0.1777991514999999e-01, 0.9627180345898023, 0.4509812715921713e-02],
];

/// Unsigned area of the triangle, zero for degenerate triangles.
pub fn triangle_area(vertices: &[Point; 3]) -> f64 {
  let [p1, p2, p3] = vertices;
  (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y)).abs() / 2.0
}

/// Maps a barycentric pair onto the triangle.
pub fn barycentric_to_cartesian(vertices: &[Point; 3], b1: f64, b2: f64) -> Point {
  let [p1, p2, p3] = vertices;
  let b3 = 1.0 - b1 - b2;
  b1 * p1 + b2 * p2 + b3 * p3
}

/// $integral_T f(x, y) dif A$ approximated with [`RULE`].
pub fn integrate<F>(f: F, vertices: &[Point; 3]) -> f64
where
  F: Fn(f64, f64) -> f64,
{
  let area = triangle_area(vertices);
  if area == 0.0 {
    return 0.0;
  }
  let sum: f64 = RULE
    .iter()
    .map(|&[b1, b2, w]| {
      let p = barycentric_to_cartesian(vertices, b1, b2);
      w * f(p.x, p.y)
    })
    .sum();
  area * sum
}

/// Integrates over element `ielement` of `mesh`.
pub fn integrate_element<F>(f: F, mesh: &TriangleMesh, ielement: ElementIdx) -> f64
where
  F: Fn(f64, f64) -> f64,
{
  integrate(f, &mesh.element_vertices(ielement))
}
