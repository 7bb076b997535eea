//! `turtlesim/TeleportAbsolute`: move the turtle to an absolute pose in one step.

ros_service! {
    TeleportAbsolute,
    md5sum: "a130bc60ee6513855dc62ea83fcc5b20",
    request: TeleportAbsoluteRequest {
        md5sum: "a130bc60ee6513855dc62ea83fcc5b20",
        definition: "float32 x\nfloat32 y\nfloat32 theta\n",
        fields: {
            x: f32,
            y: f32,
            /// Heading in radians.
            theta: f32,
        },
    },
    response: TeleportAbsoluteResponse {
        md5sum: "d41d8cd98f00b204e9800998ecf8427e",
        definition: "",
        fields: {},
    },
}
