//! `turtlesim/TeleportRelative`: drive forward by `linear` after turning by `angular`.

ros_service! {
    TeleportRelative,
    md5sum: "9d5c2dcd348ac8f76ce2a4307bd63a13",
    request: TeleportRelativeRequest {
        md5sum: "9d5c2dcd348ac8f76ce2a4307bd63a13",
        definition: "float32 linear\nfloat32 angular\n",
        fields: {
            linear: f32,
            angular: f32,
        },
    },
    response: TeleportRelativeResponse {
        md5sum: "d41d8cd98f00b204e9800998ecf8427e",
        definition: "",
        fields: {},
    },
}
